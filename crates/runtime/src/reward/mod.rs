//! Reward sequencer.
//!
//! A reward is a strictly ordered chain of animation stages. Each stage waits
//! for the previous one and owns its handles through a [`ScopedHandles`]
//! guard, so every handle is gone by the time [`RewardSequencer::play`]
//! resolves, and also if the future is dropped half-way.

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use game_core::RewardVariant;

use crate::config::RewardTimings;
use crate::events::{EventBus, GameEvent};
use crate::surface::{
    HandleId, IconKind, ParticleKind, Point, ScopedHandles, Surface, TextRole, Tween, TweenKind,
    Visual,
};

/// Stages in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RewardStage {
    DimIn,
    Entrance,
    React,
    Explode,
    /// Only when the multiplier is above 1.
    Multiplier,
    CoinReveal,
    Complete,
}

/// Inputs of one sequence run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardParams {
    /// Amount shown and persisted.
    pub coins: u32,
    /// Decorative booster multiplier.
    pub multiplier: u32,
    pub variant: RewardVariant,
}

impl RewardParams {
    pub fn new(coins: u32, multiplier: u32, variant: RewardVariant) -> Self {
        Self {
            coins,
            multiplier,
            variant,
        }
    }
}

/// What a finished sequence did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardReport {
    pub params: RewardParams,
    pub stages: Vec<RewardStage>,
}

impl RewardReport {
    fn new(params: RewardParams) -> Self {
        Self {
            params,
            stages: Vec::with_capacity(7),
        }
    }

    pub fn ran(&self, stage: RewardStage) -> bool {
        self.stages.contains(&stage)
    }
}

#[derive(Clone)]
pub struct RewardSequencer {
    surface: Arc<dyn Surface>,
    timings: RewardTimings,
    events: EventBus,
}

impl RewardSequencer {
    pub fn new(surface: Arc<dyn Surface>, timings: RewardTimings, events: EventBus) -> Self {
        Self {
            surface,
            timings,
            events,
        }
    }

    pub fn timings(&self) -> &RewardTimings {
        &self.timings
    }

    /// Runs the whole sequence. The returned future is the completion signal.
    pub async fn play(&self, params: RewardParams) -> RewardReport {
        let surface = self.surface.as_ref();
        let center = surface.bounds().center();
        let mut report = RewardReport::new(params);

        debug!(
            target: "runtime::reward",
            coins = params.coins,
            multiplier = params.multiplier,
            variant = %params.variant,
            "reward sequence started"
        );

        let mut overlay = ScopedHandles::new(surface);
        self.enter(&mut report, RewardStage::DimIn);
        let dim = overlay.create(Visual::Overlay, Point::default());
        self.tween(dim, TweenKind::FadeIn, self.timings.dim_in).await;

        self.reward_icon(&mut report, params.variant, center).await;

        if params.multiplier > 1 {
            self.multiplier(&mut report, params.multiplier, center)
                .await;
        }

        self.coin_reveal(&mut report, params.coins, center).await;

        self.tween(dim, TweenKind::FadeOut, self.timings.dim_out)
            .await;
        drop(overlay);

        self.enter(&mut report, RewardStage::Complete);
        self.events.publish(GameEvent::RewardFinished {
            coins: params.coins,
            multiplier: params.multiplier,
            variant: params.variant,
        });
        debug!(target: "runtime::reward", stages = report.stages.len(), "reward sequence complete");

        report
    }

    fn enter(&self, report: &mut RewardReport, stage: RewardStage) {
        report.stages.push(stage);
        self.events.publish(GameEvent::RewardStage { stage });
    }

    async fn tween(&self, handle: HandleId, kind: TweenKind, duration: Duration) {
        self.surface.animate(handle, Tween::new(kind, duration));
        tokio::time::sleep(duration).await;
    }

    /// Entrance, react and explode share the icon; it is destroyed with the explosion.
    async fn reward_icon(&self, report: &mut RewardReport, variant: RewardVariant, center: Point) {
        let surface = self.surface.as_ref();
        let mut icon_scope = ScopedHandles::new(surface);
        let icon_kind = match variant {
            RewardVariant::Gift => IconKind::Gift,
            RewardVariant::Treasure => IconKind::Treasure,
        };

        self.enter(report, RewardStage::Entrance);
        let icon = icon_scope.create(Visual::Icon(icon_kind), center);
        self.tween(icon, TweenKind::ScaleIn, self.timings.entrance)
            .await;

        self.enter(report, RewardStage::React);
        let react = match variant {
            RewardVariant::Gift => TweenKind::Shake,
            RewardVariant::Treasure => TweenKind::Bounce,
        };
        for _ in 0..self.timings.react_cycles {
            self.tween(icon, react, self.timings.react_cycle).await;
        }

        self.enter(report, RewardStage::Explode);
        let mut particles = ScopedHandles::new(surface);
        let count = self.timings.explosion_particles;
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let particle = particles.create(Visual::Particle(ParticleKind::Explosion), center);
            let target = center.offset_polar(angle, 120.0);
            surface.animate(
                particle,
                Tween::new(
                    TweenKind::Burst {
                        dx: target.x - center.x,
                        dy: target.y - center.y,
                    },
                    self.timings.explosion,
                ),
            );
        }
        self.tween(icon, TweenKind::FadeOut, self.timings.explosion)
            .await;
    }

    async fn multiplier(&self, report: &mut RewardReport, multiplier: u32, center: Point) {
        let surface = self.surface.as_ref();
        let mut scope = ScopedHandles::new(surface);

        self.enter(report, RewardStage::Multiplier);
        let text = scope.create(
            Visual::text(format!("x{multiplier}"), TextRole::Multiplier),
            center,
        );

        let count = self.timings.glow_particles;
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let glow = scope.create(
                Visual::Particle(ParticleKind::Glow),
                center.offset_polar(angle, 80.0),
            );
            surface.animate(glow, Tween::new(TweenKind::Pulse, self.timings.multiplier_pulse));
        }

        self.tween(text, TweenKind::ScaleIn, self.timings.multiplier_enter)
            .await;
        self.tween(text, TweenKind::Pulse, self.timings.multiplier_pulse)
            .await;
        self.tween(text, TweenKind::FadeOut, self.timings.multiplier_fade)
            .await;
    }

    async fn coin_reveal(&self, report: &mut RewardReport, coins: u32, center: Point) {
        let surface = self.surface.as_ref();
        let mut scope = ScopedHandles::new(surface);

        self.enter(report, RewardStage::CoinReveal);
        let coin = scope.create(
            Visual::Icon(IconKind::Coin),
            Point::new(center.x, center.y - 30.0),
        );
        let amount = scope.create(
            Visual::text(format!("+{coins}"), TextRole::CoinAmount),
            Point::new(center.x, center.y + 50.0),
        );

        surface.animate(coin, Tween::new(TweenKind::ScaleIn, self.timings.coin_enter));
        self.tween(amount, TweenKind::ScaleIn, self.timings.coin_enter)
            .await;

        let count = self.timings.coin_sparkles;
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let sparkle = scope.create(
                Visual::Particle(ParticleKind::Sparkle),
                center.offset_polar(angle, 60.0),
            );
            surface.animate(sparkle, Tween::new(TweenKind::Flash, self.timings.coin_hold));
        }
        tokio::time::sleep(self.timings.coin_hold).await;

        surface.animate(coin, Tween::new(TweenKind::FadeOut, self.timings.coin_fade));
        self.tween(amount, TweenKind::FadeOut, self.timings.coin_fade)
            .await;
    }
}

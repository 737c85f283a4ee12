use nextoddlers_core::Celebration;

/// 彩纸特效，发出即返回
pub trait CelebrationEffect: Send + Sync {
    fn celebrate(&self, burst: &Celebration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCelebration;

impl CelebrationEffect for LoggingCelebration {
    fn celebrate(&self, burst: &Celebration) {
        tracing::debug!(
            particles = burst.particle_count,
            spread = burst.spread,
            colors = ?burst.colors,
            "confetti"
        );
    }
}

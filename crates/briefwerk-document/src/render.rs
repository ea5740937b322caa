// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The HTML→PDF renderer seam and its single-instance pool.
//
// Headless renderers are expensive to launch, so one live instance is
// cached and reused across requests. An unhealthy instance (crashed
// process, dropped connection) is discarded and recreated transparently.
// A background reaper tears the instance down after a period of
// inactivity so an idle service does not pin renderer resources.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use briefwerk_core::error::{BriefwerkError, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Black-box capability that turns composed HTML into PDF bytes.
///
/// Implementations wrap whatever actually does the conversion (a headless
/// browser, a print service, a fixture in tests). The engine never looks
/// inside the returned bytes.
pub trait HtmlRenderer: Send {
    fn render_pdf(&self, html: &str) -> Result<Vec<u8>>;

    /// Whether this instance can still serve requests. Unhealthy instances
    /// are dropped and recreated by the pool.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Factory producing fresh renderer instances on demand.
pub type RendererFactory = Box<dyn Fn() -> Result<Box<dyn HtmlRenderer>> + Send + Sync>;

struct PoolState {
    renderer: Option<Box<dyn HtmlRenderer>>,
    last_used: Instant,
}

/// Single-instance renderer cache with idle-timeout cleanup.
pub struct RendererPool {
    factory: RendererFactory,
    idle_timeout: Duration,
    state: Mutex<PoolState>,
}

impl RendererPool {
    pub fn new(
        factory: impl Fn() -> Result<Box<dyn HtmlRenderer>> + Send + Sync + 'static,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            idle_timeout,
            state: Mutex::new(PoolState {
                renderer: None,
                last_used: Instant::now(),
            }),
        }
    }

    /// Render `html` to PDF bytes, creating or replacing the cached
    /// renderer instance as needed.
    pub fn render(&self, html: &str) -> Result<Vec<u8>> {
        let mut state = self.state.lock().expect("renderer pool lock poisoned");

        // Discard a cached instance that can no longer serve requests.
        if state
            .renderer
            .as_ref()
            .is_some_and(|r| !r.is_healthy())
        {
            warn!("cached renderer unhealthy — discarding");
            state.renderer = None;
        }

        if state.renderer.is_none() {
            debug!("launching renderer instance");
            let renderer = (self.factory)()
                .map_err(|e| BriefwerkError::RendererUnavailable(e.to_string()))?;
            state.renderer = Some(renderer);
        }

        state.last_used = Instant::now();
        state
            .renderer
            .as_ref()
            .expect("renderer present after creation")
            .render_pdf(html)
    }

    /// Drop the cached instance if it has been idle past the timeout.
    ///
    /// Returns `true` when an instance was torn down.
    pub fn reap_idle(&self) -> bool {
        let mut state = self.state.lock().expect("renderer pool lock poisoned");
        if state.renderer.is_some() && state.last_used.elapsed() >= self.idle_timeout {
            info!(
                idle_secs = state.last_used.elapsed().as_secs(),
                "tearing down idle renderer"
            );
            state.renderer = None;
            true
        } else {
            false
        }
    }

    /// Drop the cached instance unconditionally (shutdown path).
    pub fn shutdown(&self) {
        let mut state = self.state.lock().expect("renderer pool lock poisoned");
        if state.renderer.take().is_some() {
            info!("renderer shut down");
        }
    }

    /// Whether a live instance is currently cached.
    pub fn is_warm(&self) -> bool {
        self.state
            .lock()
            .expect("renderer pool lock poisoned")
            .renderer
            .is_some()
    }

    /// Spawn a background task that periodically reaps the idle instance.
    ///
    /// The task runs until aborted; callers keep the handle and abort it on
    /// shutdown.
    pub fn spawn_reaper(self: Arc<Self>, sweep_interval: Duration) -> JoinHandle<()> {
        let pool = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            // The first tick fires immediately; skip it so a fresh pool is
            // not swept before first use.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                pool.reap_idle();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Renderer that records activity and has switchable health.
    struct CountingRenderer {
        renders: Arc<AtomicUsize>,
        healthy: Arc<AtomicBool>,
    }

    impl HtmlRenderer for CountingRenderer {
        fn render_pdf(&self, html: &str) -> Result<Vec<u8>> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(html.as_bytes().to_vec())
        }

        fn is_healthy(&self) -> bool {
            self.healthy.load(Ordering::SeqCst)
        }
    }

    struct Fixture {
        pool: Arc<RendererPool>,
        launches: Arc<AtomicUsize>,
        renders: Arc<AtomicUsize>,
        healthy: Arc<AtomicBool>,
    }

    fn fixture(idle_timeout: Duration) -> Fixture {
        let launches = Arc::new(AtomicUsize::new(0));
        let renders = Arc::new(AtomicUsize::new(0));
        let healthy = Arc::new(AtomicBool::new(true));

        let launches_in_factory = Arc::clone(&launches);
        let renders_in_factory = Arc::clone(&renders);
        let healthy_in_factory = Arc::clone(&healthy);

        let pool = Arc::new(RendererPool::new(
            move || {
                launches_in_factory.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(CountingRenderer {
                    renders: Arc::clone(&renders_in_factory),
                    healthy: Arc::clone(&healthy_in_factory),
                }) as Box<dyn HtmlRenderer>)
            },
            idle_timeout,
        ));

        Fixture {
            pool,
            launches,
            renders,
            healthy,
        }
    }

    #[test]
    fn instance_is_reused_across_renders() {
        let f = fixture(Duration::from_secs(300));

        let pdf = f.pool.render("<html>one</html>").expect("render");
        assert_eq!(pdf, b"<html>one</html>");
        f.pool.render("<html>two</html>").expect("render");

        assert_eq!(f.launches.load(Ordering::SeqCst), 1);
        assert_eq!(f.renders.load(Ordering::SeqCst), 2);
        assert!(f.pool.is_warm());
    }

    #[test]
    fn unhealthy_instance_is_replaced() {
        let f = fixture(Duration::from_secs(300));

        f.pool.render("a").expect("render");
        f.healthy.store(false, Ordering::SeqCst);
        f.pool.render("b").expect("render");

        assert_eq!(f.launches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn idle_instance_is_reaped() {
        let f = fixture(Duration::from_millis(5));

        f.pool.render("a").expect("render");
        assert!(f.pool.is_warm());

        std::thread::sleep(Duration::from_millis(20));
        assert!(f.pool.reap_idle());
        assert!(!f.pool.is_warm());
    }

    #[test]
    fn busy_instance_is_not_reaped() {
        let f = fixture(Duration::from_secs(300));
        f.pool.render("a").expect("render");
        assert!(!f.pool.reap_idle());
        assert!(f.pool.is_warm());
    }

    #[test]
    fn shutdown_drops_the_instance() {
        let f = fixture(Duration::from_secs(300));
        f.pool.render("a").expect("render");
        f.pool.shutdown();
        assert!(!f.pool.is_warm());

        // Next render relaunches.
        f.pool.render("b").expect("render");
        assert_eq!(f.launches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn factory_failure_surfaces_as_renderer_unavailable() {
        let pool = RendererPool::new(
            || Err(BriefwerkError::Render("launch failed".into())),
            Duration::from_secs(300),
        );
        let result = pool.render("a");
        assert!(matches!(
            result,
            Err(BriefwerkError::RendererUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn reaper_task_tears_down_idle_instance() {
        let f = fixture(Duration::from_millis(20));
        f.pool.render("a").expect("render");
        assert!(f.pool.is_warm());

        let reaper = Arc::clone(&f.pool).spawn_reaper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!f.pool.is_warm());
        reaper.abort();
    }
}

//! Mirror compositing session
//!
//! The mirror surface is an offscreen-composited copy of the video. A
//! repeating timer, independent of the video's own frame timing, copies the
//! current frame onto it.
//!
//! ```text
//!   <video id=stream hidden>  ──current_frame()──►  copy timer (1/60 s)
//!   <canvas id=canvas-mirror>  ◄──copy_frame_from()──┘
//! ```
//!
//! Every tick checks its source and target on its own, so aborting the
//! timer is the only teardown the session needs besides detaching the
//! surface.

use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::surface::platform::{Platform, RenderSurface, Stretch, Surface, SurfaceId, VideoElement};
use crate::surface::state::MirrorSession;

/// Element id of the mirror surface
pub const MIRROR_SURFACE_ID: &str = "canvas-mirror";

/// Create the mirror surface, attach it after the video and start copying
///
/// The surface is created hidden; the caller decides when to swap it in.
/// Must be called from within a `LocalSet`.
pub(crate) fn open_session<P: Platform>(
    platform: &P,
    video: &P::Video,
    period: Duration,
) -> MirrorSession<P::Mirror> {
    let size = video.intrinsic_size();
    let surface = platform.create_surface(
        SurfaceId::new(MIRROR_SURFACE_ID),
        size.width as u32,
        size.height as u32,
    );
    surface.set_stretch(Stretch::for_size(size));
    platform.attach_after(&surface, video);

    let surface = Rc::new(surface);
    let timer = spawn_copy_timer(video.clone(), Rc::downgrade(&surface), period);

    tracing::debug!(
        width = size.width,
        height = size.height,
        period_ms = period.as_secs_f64() * 1000.0,
        "Mirror surface created"
    );

    MirrorSession::new(surface, timer)
}

/// Spawn the repeating frame copy task
///
/// A tick is skipped while the video is paused or ended. The task ends by
/// itself once the surface has been dropped.
pub(crate) fn spawn_copy_timer<V, M>(video: V, surface: Weak<M>, period: Duration) -> JoinHandle<()>
where
    V: VideoElement + 'static,
    M: RenderSurface + 'static,
{
    tokio::task::spawn_local(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(surface) = surface.upgrade() else {
                tracing::trace!("Mirror surface gone, copy timer exiting");
                break;
            };
            if video.is_paused() || video.is_ended() {
                continue;
            }
            if let Some(frame) = video.current_frame() {
                surface.copy_frame_from(&frame);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use super::*;
    use crate::surface::fake::FakePlatform;

    const PERIOD: Duration = Duration::from_millis(10);

    #[tokio::test(start_paused = true)]
    async fn test_open_session_attaches_after_video() {
        let platform = FakePlatform::new();
        platform.dom.borrow_mut().intrinsic = crate::surface::Size::new(240.0, 320.0);
        let video = platform.video();

        LocalSet::new()
            .run_until(async {
                let session = open_session(&platform, &video, PERIOD);

                let dom = platform.dom.borrow();
                assert_eq!(dom.attached, vec!["stream", MIRROR_SURFACE_ID]);
                assert_eq!(dom.pixel_size[MIRROR_SURFACE_ID], (240.0, 320.0));
                assert_eq!(dom.stretch[MIRROR_SURFACE_ID], Stretch::Vertical);
                assert!(dom.is_hidden(MIRROR_SURFACE_ID));
                assert!(session.timer_running());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_copies_periodically() {
        let platform = FakePlatform::new();
        let video = platform.video();

        LocalSet::new()
            .run_until(async {
                let _session = open_session(&platform, &video, PERIOD);
                sleep(Duration::from_millis(45)).await;

                let copies = platform.dom.borrow().copies;
                assert!((4..=6).contains(&copies), "copies = {}", copies);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_skips_paused_video() {
        let platform = FakePlatform::new();
        platform.dom.borrow_mut().paused = true;
        let video = platform.video();

        LocalSet::new()
            .run_until(async {
                let session = open_session(&platform, &video, PERIOD);
                sleep(Duration::from_millis(45)).await;

                assert_eq!(platform.dom.borrow().copies, 0);
                assert!(session.timer_running());

                platform.dom.borrow_mut().paused = false;
                sleep(Duration::from_millis(25)).await;
                assert!(platform.dom.borrow().copies > 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_exits_when_surface_dropped() {
        let platform = FakePlatform::new();
        let video = platform.video();

        LocalSet::new()
            .run_until(async {
                let surface = Rc::new(platform.create_surface(SurfaceId::new("probe"), 1, 1));
                let timer = spawn_copy_timer(video.clone(), Rc::downgrade(&surface), PERIOD);

                sleep(Duration::from_millis(15)).await;
                let before = platform.dom.borrow().copies;
                assert!(before > 0);

                drop(surface);
                sleep(Duration::from_millis(30)).await;

                assert_eq!(platform.dom.borrow().copies, before);
                assert!(timer.is_finished());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_stops_copies() {
        let platform = FakePlatform::new();
        let video = platform.video();

        LocalSet::new()
            .run_until(async {
                let session = open_session(&platform, &video, PERIOD);
                sleep(Duration::from_millis(15)).await;

                drop(session);
                let before = platform.dom.borrow().copies;
                sleep(Duration::from_millis(50)).await;

                assert_eq!(platform.dom.borrow().copies, before);
            })
            .await;
    }
}

//! In-memory platform double that records every call

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bytes::Bytes;

use super::platform::{
    LocalFuture, ObjectFit, Platform, RenderSurface, Size, Stretch, Surface, SurfaceId,
    VideoElement, VideoFrame, Viewport,
};
use crate::error::PlatformError;

pub(crate) const VIDEO_ID: &str = "stream";

/// Recorded document state
pub(crate) struct Dom {
    pub hidden: HashMap<String, bool>,
    pub pixel_size: HashMap<String, (f64, f64)>,
    pub fit: HashMap<String, ObjectFit>,
    pub aspect: HashMap<String, f64>,
    pub stretch: HashMap<String, Stretch>,
    pub computed_height: f64,

    pub intrinsic: Size,
    pub paused: bool,
    pub ended: bool,
    pub offset: Size,
    pub bounding: Size,
    pub padding: Vec<f64>,
    pub media_controls: bool,
    pub blurs: usize,
    pub volume: f64,
    pub muted: bool,
    pub poster: Option<String>,

    pub plays: usize,
    pub play_result: Result<(), PlatformError>,
    pub lock_requests: usize,
    pub lock_result: Result<(), PlatformError>,

    pub created: Vec<String>,
    pub attached: Vec<String>,
    pub copies: usize,

    pub viewport: Viewport,
    pub fullscreen_requests: Vec<bool>,
    pub mobile: bool,
}

impl Default for Dom {
    fn default() -> Self {
        Self {
            hidden: HashMap::new(),
            pixel_size: HashMap::new(),
            fit: HashMap::new(),
            aspect: HashMap::new(),
            stretch: HashMap::new(),
            computed_height: 480.0,
            intrinsic: Size::new(320.0, 240.0),
            paused: false,
            ended: false,
            offset: Size::new(640.0, 480.0),
            bounding: Size::new(640.0, 480.0),
            padding: Vec::new(),
            media_controls: true,
            blurs: 0,
            volume: 1.0,
            muted: false,
            poster: None,
            plays: 0,
            play_result: Ok(()),
            lock_requests: 0,
            lock_result: Ok(()),
            created: Vec::new(),
            attached: vec![VIDEO_ID.to_string()],
            copies: 0,
            viewport: Viewport {
                window: Size::new(1920.0, 1080.0),
                inner: Size::new(1920.0, 1080.0),
                document: Size::new(1920.0, 1080.0),
            },
            fullscreen_requests: Vec::new(),
            mobile: false,
        }
    }
}

impl Dom {
    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.get(id).copied().unwrap_or(false)
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakePlatform {
    pub dom: Rc<RefCell<Dom>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub(crate) struct FakeVideo {
    dom: Rc<RefCell<Dom>>,
}

pub(crate) struct FakeCanvas {
    id: SurfaceId,
    dom: Rc<RefCell<Dom>>,
}

fn record_surface(dom: &RefCell<Dom>, id: &str, f: impl FnOnce(&mut Dom, String)) {
    f(&mut dom.borrow_mut(), id.to_string());
}

impl Surface for FakeVideo {
    fn id(&self) -> SurfaceId {
        SurfaceId::new(VIDEO_ID)
    }

    fn set_hidden(&self, hidden: bool) {
        record_surface(&self.dom, VIDEO_ID, |dom, id| {
            dom.hidden.insert(id, hidden);
        });
    }

    fn set_pixel_size(&self, width: f64, height: f64) {
        record_surface(&self.dom, VIDEO_ID, |dom, id| {
            dom.pixel_size.insert(id, (width, height));
        });
    }

    fn set_object_fit(&self, fit: ObjectFit) {
        record_surface(&self.dom, VIDEO_ID, |dom, id| {
            dom.fit.insert(id, fit);
        });
    }

    fn set_aspect_ratio(&self, aspect: f64) {
        record_surface(&self.dom, VIDEO_ID, |dom, id| {
            dom.aspect.insert(id, aspect);
        });
    }

    fn computed_height(&self) -> f64 {
        self.dom.borrow().computed_height
    }
}

impl VideoElement for FakeVideo {
    fn intrinsic_size(&self) -> Size {
        self.dom.borrow().intrinsic
    }

    fn is_paused(&self) -> bool {
        self.dom.borrow().paused
    }

    fn is_ended(&self) -> bool {
        self.dom.borrow().ended
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        let dom = self.dom.borrow();
        Some(VideoFrame {
            width: dom.intrinsic.width as u32,
            height: dom.intrinsic.height as u32,
            data: Bytes::from_static(&[0, 0, 0, 255]),
        })
    }

    fn offset_size(&self) -> Size {
        self.dom.borrow().offset
    }

    fn bounding_size(&self) -> Size {
        self.dom.borrow().bounding
    }

    fn set_horizontal_padding(&self, padding: f64) {
        self.dom.borrow_mut().padding.push(padding);
    }

    fn set_media_controls(&self, visible: bool) {
        self.dom.borrow_mut().media_controls = visible;
    }

    fn blur(&self) {
        self.dom.borrow_mut().blurs += 1;
    }

    fn set_volume(&self, volume: f64) {
        self.dom.borrow_mut().volume = volume;
    }

    fn set_muted(&self, muted: bool) {
        self.dom.borrow_mut().muted = muted;
    }

    fn set_poster(&self, poster: Option<&str>) {
        self.dom.borrow_mut().poster = poster.map(str::to_string);
    }

    fn play(&self) -> LocalFuture<Result<(), PlatformError>> {
        let result = {
            let mut dom = self.dom.borrow_mut();
            dom.plays += 1;
            dom.play_result.clone()
        };
        Box::pin(async move { result })
    }

    fn request_pointer_lock(&self) -> LocalFuture<Result<(), PlatformError>> {
        let result = {
            let mut dom = self.dom.borrow_mut();
            dom.lock_requests += 1;
            dom.lock_result.clone()
        };
        Box::pin(async move { result })
    }
}

impl Surface for FakeCanvas {
    fn id(&self) -> SurfaceId {
        self.id.clone()
    }

    fn set_hidden(&self, hidden: bool) {
        record_surface(&self.dom, self.id.as_str(), |dom, id| {
            dom.hidden.insert(id, hidden);
        });
    }

    fn set_pixel_size(&self, width: f64, height: f64) {
        record_surface(&self.dom, self.id.as_str(), |dom, id| {
            dom.pixel_size.insert(id, (width, height));
        });
    }

    fn set_object_fit(&self, fit: ObjectFit) {
        record_surface(&self.dom, self.id.as_str(), |dom, id| {
            dom.fit.insert(id, fit);
        });
    }

    fn set_aspect_ratio(&self, aspect: f64) {
        record_surface(&self.dom, self.id.as_str(), |dom, id| {
            dom.aspect.insert(id, aspect);
        });
    }

    fn computed_height(&self) -> f64 {
        self.dom.borrow().computed_height
    }
}

impl RenderSurface for FakeCanvas {
    fn set_stretch(&self, stretch: Stretch) {
        record_surface(&self.dom, self.id.as_str(), |dom, id| {
            dom.stretch.insert(id, stretch);
        });
    }

    fn copy_frame_from(&self, _frame: &VideoFrame) {
        self.dom.borrow_mut().copies += 1;
    }
}

impl Platform for FakePlatform {
    type Video = FakeVideo;
    type Mirror = FakeCanvas;

    fn video(&self) -> FakeVideo {
        FakeVideo {
            dom: Rc::clone(&self.dom),
        }
    }

    fn create_surface(&self, id: SurfaceId, width: u32, height: u32) -> FakeCanvas {
        {
            let mut dom = self.dom.borrow_mut();
            dom.created.push(id.to_string());
            dom.hidden.insert(id.to_string(), true);
            dom.pixel_size
                .insert(id.to_string(), (width as f64, height as f64));
        }
        FakeCanvas {
            id,
            dom: Rc::clone(&self.dom),
        }
    }

    fn attach_after(&self, surface: &FakeCanvas, anchor: &FakeVideo) {
        let mut dom = self.dom.borrow_mut();
        let anchor = anchor.id().to_string();
        let pos = dom
            .attached
            .iter()
            .position(|id| *id == anchor)
            .map_or(dom.attached.len(), |p| p + 1);
        dom.attached.insert(pos, surface.id.to_string());
    }

    fn detach(&self, surface: &FakeCanvas) {
        let id = surface.id.to_string();
        self.dom.borrow_mut().attached.retain(|a| *a != id);
    }

    fn viewport(&self) -> Viewport {
        self.dom.borrow().viewport
    }

    fn set_fullscreen(&self, enter: bool, _target: &SurfaceId) {
        self.dom.borrow_mut().fullscreen_requests.push(enter);
    }

    fn is_mobile_device(&self) -> bool {
        self.dom.borrow().mobile
    }
}

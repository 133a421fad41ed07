use std::collections::{HashMap, HashSet};

use drm_common::{MediaAppType, MediaObject};

/// Tracks the last-pushed version per `(app_type, transport_id)` so a
/// given body version is surfaced to status clients exactly once, plus
/// which data applications have been observed on air at all.
#[derive(Default)]
pub struct MediaRegistry {
    last_pushed: HashMap<(MediaAppType, u16), u32>,
    pending: HashMap<MediaAppType, MediaObject>,
    present: HashSet<MediaAppType>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        MediaRegistry::default()
    }

    /// Records a freshly-received object as a candidate for the next
    /// snapshot, and marks its application as present going forward.
    /// Does not itself mark the object as pushed.
    pub fn offer(&mut self, object: MediaObject) {
        self.present.insert(object.app_type);
        self.pending.insert(object.app_type, object);
    }

    /// Returns the pending object for `app_type` if its version hasn't
    /// already been pushed, and marks it pushed.
    pub fn take_new_version(&mut self, app_type: MediaAppType) -> Option<MediaObject> {
        let object = self.pending.get(&app_type)?;
        let key = (app_type, object.transport_id);
        let already_pushed = self.last_pushed.get(&key) == Some(&object.version);
        if already_pushed {
            return None;
        }
        let object = self.pending.remove(&app_type)?;
        self.last_pushed.insert(key, object.version);
        Some(object)
    }

    pub fn has_pending(&self, app_type: MediaAppType) -> bool {
        self.pending.contains_key(&app_type)
    }

    /// Whether `app_type` has ever been offered an object — a
    /// persistent "this application is carried" indicator, unlike
    /// `has_pending` which clears the moment the object is pushed.
    pub fn is_present(&self, app_type: MediaAppType) -> bool {
        self.present.contains(&app_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(app_type: MediaAppType, transport_id: u16, version: u32) -> MediaObject {
        MediaObject {
            app_type,
            transport_id,
            version,
            mime_type: "image/jpeg".to_string(),
            name: Some("slide.jpg".to_string()),
            description: None,
            body: vec![1, 2, 3],
        }
    }

    #[test]
    fn pushes_each_distinct_version_exactly_once() {
        let mut registry = MediaRegistry::new();
        registry.offer(object(MediaAppType::Slideshow, 7, 3));

        assert!(registry.take_new_version(MediaAppType::Slideshow).is_some());
        registry.offer(object(MediaAppType::Slideshow, 7, 3));
        assert!(registry.take_new_version(MediaAppType::Slideshow).is_none());
    }

    #[test]
    fn new_version_is_pushed_again() {
        let mut registry = MediaRegistry::new();
        registry.offer(object(MediaAppType::Slideshow, 7, 3));
        registry.take_new_version(MediaAppType::Slideshow);

        registry.offer(object(MediaAppType::Slideshow, 7, 4));
        assert!(registry.take_new_version(MediaAppType::Slideshow).is_some());
    }

    #[test]
    fn presence_persists_after_the_object_is_pushed_and_has_no_pending() {
        let mut registry = MediaRegistry::new();
        assert!(!registry.is_present(MediaAppType::Slideshow));

        registry.offer(object(MediaAppType::Slideshow, 7, 3));
        registry.take_new_version(MediaAppType::Slideshow);

        assert!(!registry.has_pending(MediaAppType::Slideshow));
        assert!(registry.is_present(MediaAppType::Slideshow));
    }
}

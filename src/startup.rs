//! Join of "every image settled" and "document interactive".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    Loaded,
    Failed,
}

/// What the renderer gets once startup fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    /// Indices of images that loaded, in configuration order.
    pub loaded: Vec<usize>,
    /// Indices of images that failed or timed out.
    pub failed: Vec<usize>,
}

/// Fires exactly once, when all images are settled and the document is ready.
#[derive(Debug, Clone)]
pub struct StartupGate {
    images: Vec<ImageStatus>,
    document_ready: bool,
    fired: bool,
}

impl StartupGate {
    pub fn new(image_count: usize) -> Self {
        Self {
            images: vec![ImageStatus::Pending; image_count],
            document_ready: false,
            fired: false,
        }
    }

    pub fn status(&self, index: usize) -> Option<ImageStatus> {
        self.images.get(index).copied()
    }

    pub fn pending(&self) -> usize {
        self.images
            .iter()
            .filter(|status| **status == ImageStatus::Pending)
            .count()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn image_loaded(&mut self, index: usize) -> Option<Readiness> {
        self.settle(index, ImageStatus::Loaded)
    }

    pub fn image_failed(&mut self, index: usize) -> Option<Readiness> {
        self.settle(index, ImageStatus::Failed)
    }

    pub fn document_ready(&mut self) -> Option<Readiness> {
        self.document_ready = true;
        self.try_fire()
    }

    /// Gives up on pending images; they count as failed from here on.
    pub fn timed_out(&mut self) -> Option<Readiness> {
        for status in &mut self.images {
            if *status == ImageStatus::Pending {
                *status = ImageStatus::Failed;
            }
        }
        self.try_fire()
    }

    fn settle(&mut self, index: usize, outcome: ImageStatus) -> Option<Readiness> {
        match self.images.get_mut(index) {
            // first outcome wins; a late load after a timeout stays failed
            Some(status) if *status == ImageStatus::Pending => *status = outcome,
            _ => return None,
        }
        self.try_fire()
    }

    fn try_fire(&mut self) -> Option<Readiness> {
        if self.fired || !self.document_ready || self.pending() > 0 {
            return None;
        }
        self.fired = true;
        let mut readiness = Readiness {
            loaded: Vec::new(),
            failed: Vec::new(),
        };
        for (index, status) in self.images.iter().enumerate() {
            match status {
                ImageStatus::Loaded => readiness.loaded.push(index),
                _ => readiness.failed.push(index),
            }
        }
        Some(readiness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_document_and_every_image() {
        let mut gate = StartupGate::new(2);
        assert_eq!(gate.image_loaded(0), None);
        assert_eq!(gate.document_ready(), None);
        let ready = gate.image_loaded(1).expect("fires on last image");
        assert_eq!(ready.loaded, vec![0, 1]);
        assert!(ready.failed.is_empty());
    }

    #[test]
    fn images_first_then_document() {
        let mut gate = StartupGate::new(1);
        assert_eq!(gate.image_loaded(0), None);
        assert!(gate.document_ready().is_some());
    }

    #[test]
    fn fires_once() {
        let mut gate = StartupGate::new(1);
        gate.document_ready();
        assert!(gate.image_loaded(0).is_some());
        assert_eq!(gate.document_ready(), None);
        assert_eq!(gate.timed_out(), None);
        assert!(gate.has_fired());
    }

    #[test]
    fn timeout_fails_stragglers() {
        let mut gate = StartupGate::new(3);
        gate.image_loaded(1);
        gate.document_ready();
        let ready = gate.timed_out().expect("timeout settles the rest");
        assert_eq!(ready.loaded, vec![1]);
        assert_eq!(ready.failed, vec![0, 2]);
        assert_eq!(gate.image_loaded(0), None);
        assert_eq!(gate.status(0), Some(ImageStatus::Failed));
    }

    #[test]
    fn timeout_before_document_ready_still_waits_for_it() {
        let mut gate = StartupGate::new(1);
        assert_eq!(gate.timed_out(), None);
        let ready = gate.document_ready().expect("document completes the join");
        assert_eq!(ready.failed, vec![0]);
    }

    #[test]
    fn no_images_needs_only_the_document() {
        let mut gate = StartupGate::new(0);
        assert!(gate.document_ready().is_some());
    }
}

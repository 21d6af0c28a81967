//! Picks background image variants by the device's physical resolution.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetBucket {
    Vert720,
    Vert900,
    Vert1080,
    Vert1440,
    P720,
    P900,
    P1080,
    P1440,
    P4k,
}

const PORTRAIT: [(f32, AssetBucket); 3] = [
    (720.0, AssetBucket::Vert720),
    (900.0, AssetBucket::Vert900),
    (1080.0, AssetBucket::Vert1080),
];

const LANDSCAPE: [(f32, AssetBucket); 4] = [
    (720.0, AssetBucket::P720),
    (900.0, AssetBucket::P900),
    (1080.0, AssetBucket::P1080),
    (1440.0, AssetBucket::P1440),
];

impl AssetBucket {
    /// Smallest bucket covering a screen of `width × height` CSS pixels at
    /// `device_pixel_ratio`.
    ///
    /// Portrait screens bucket on width and landscape screens on height;
    /// anything beyond the largest bucket gets the largest asset.
    pub fn select(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let (w, h) = (width * ratio, height * ratio);
        if w < h {
            pick(&PORTRAIT, w, AssetBucket::Vert1440)
        } else {
            pick(&LANDSCAPE, h, AssetBucket::P4k)
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            AssetBucket::Vert720
            | AssetBucket::Vert900
            | AssetBucket::Vert1080
            | AssetBucket::Vert1440 => Orientation::Portrait,
            _ => Orientation::Landscape,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            AssetBucket::Vert720 => "vert720p",
            AssetBucket::Vert900 => "vert900p",
            AssetBucket::Vert1080 => "vert1080p",
            AssetBucket::Vert1440 => "vert1440p",
            AssetBucket::P720 => "720p",
            AssetBucket::P900 => "900p",
            AssetBucket::P1080 => "1080p",
            AssetBucket::P1440 => "1440p",
            AssetBucket::P4k => "4k",
        }
    }

    /// Substitutes `{bucket}` in a URL template.
    pub fn resolve(&self, template: &str) -> String {
        template.replace("{bucket}", self.suffix())
    }
}

fn pick(table: &[(f32, AssetBucket)], size: f32, largest: AssetBucket) -> AssetBucket {
    table
        .iter()
        .find(|(limit, _)| size <= *limit)
        .map_or(largest, |(_, bucket)| *bucket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_buckets_on_height() {
        assert_eq!(AssetBucket::select(1280.0, 720.0, 1.0), AssetBucket::P720);
        assert_eq!(AssetBucket::select(1600.0, 900.0, 1.0), AssetBucket::P900);
        assert_eq!(AssetBucket::select(1920.0, 1080.0, 1.0), AssetBucket::P1080);
        assert_eq!(AssetBucket::select(1920.0, 1080.0, 1.25), AssetBucket::P1440);
        assert_eq!(AssetBucket::select(1920.0, 1080.0, 2.0), AssetBucket::P4k);
    }

    #[test]
    fn portrait_buckets_on_width() {
        assert_eq!(AssetBucket::select(360.0, 800.0, 2.0), AssetBucket::Vert720);
        assert_eq!(AssetBucket::select(390.0, 844.0, 3.0), AssetBucket::Vert1440);
        assert_eq!(AssetBucket::select(1080.0, 1920.0, 1.0).orientation(), Orientation::Portrait);
    }

    #[test]
    fn bad_pixel_ratio_falls_back_to_one() {
        assert_eq!(AssetBucket::select(1280.0, 720.0, 0.0), AssetBucket::P720);
    }

    #[test]
    fn resolve_fills_template() {
        assert_eq!(
            AssetBucket::P1080.resolve("assets/bkgd/bkgd-{bucket}.jpg"),
            "assets/bkgd/bkgd-1080p.jpg"
        );
    }
}

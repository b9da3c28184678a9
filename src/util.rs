use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Last path-ish segment of an id, used when a node carries no display name.
pub fn display_label(id: &str) -> &str {
    id.rsplit(['/', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(id)
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_takes_last_segment() {
        assert_eq!(display_label("src/core/auth"), "auth");
        assert_eq!(display_label("billing::invoices"), "invoices");
        assert_eq!(display_label("gateway"), "gateway");
        assert_eq!(display_label("pkg/"), "pkg");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (ax, ay) = stable_pair("svc-payments");
        let (bx, by) = stable_pair("svc-payments");
        assert_eq!((ax, ay), (bx, by));
        assert!((-1.0..=1.0).contains(&ax) && (-1.0..=1.0).contains(&ay));
    }
}

//! Free space around a reference box

use wayfind_dom::{DOMRect, Viewport};

/// Distance from each edge of a reference box to the matching viewport
/// edge (top, right, bottom, left). Negative when the box crosses it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSpace {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeSpace {
    pub fn around(reference: &DOMRect, viewport: &Viewport) -> Self {
        Self {
            top: reference.top(),
            right: viewport.width - reference.right(),
            bottom: viewport.height - reference.bottom(),
            left: reference.left(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_around() {
        let vp = Viewport::new(1000.0, 600.0);
        let space = EdgeSpace::around(&DOMRect::from_xywh(100.0, 50.0, 200.0, 100.0), &vp);
        assert_eq!(space, EdgeSpace { top: 50.0, right: 700.0, bottom: 450.0, left: 100.0 });
    }
}

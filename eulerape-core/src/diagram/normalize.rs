use log::debug;

use crate::geometry::{bbox::BBox, r2::R2, transform::{CanProject, Projection, Transform::{Scale, Translate}}};

use super::EllipseDiagram;

impl EllipseDiagram {
    /// Apply `projection` to every ellipse. Areas scale with it, so cached values are dropped.
    pub fn project(&mut self, projection: &Projection) -> bool {
        self.map_ellipses(|e| e.apply(projection))
    }

    /// Uniformly scale and translate the diagram to fit inside `target`, centered.
    pub fn scale_to_fit(&mut self, target: &BBox) -> bool {
        let current = self.bounding_box();
        let (w, h) = (current.width(), current.height());
        if !(w > 0. && h > 0.) || !(target.width() > 0. && target.height() > 0.) {
            return false;
        }
        let k = (target.width() / w).min(target.height() / h);
        debug!("scaling diagram by {:.4} into {:?}", k, target);
        let projection = Projection(vec![
            Translate(-current.center()),
            Scale(k),
            Translate(target.center()),
        ]);
        self.project(&projection)
    }

    /// Translate so the bounding box is centered on the origin.
    pub fn center(&mut self) -> bool {
        let offset = self.bounding_box().center();
        if offset == (R2 { x: 0., y: 0. }) {
            return true;
        }
        self.project(&Projection(vec![ Translate(-offset) ]))
    }
}

//! Update coordinator
//!
//! Rebuilds the scene when the shape id or its parameters change: releases
//! the old subtree and annotations, builds and attaches the new ones, then
//! reframes the camera for the shape family.

use glam::Vec3;
use shared::{ParameterError, ShapeDescriptor, ShapeFamily, ShapeKind};

use crate::annotations::build_annotations;
use crate::geometry::build_shape;
use crate::scene::{AnnotationSet, LabelRenderer, SceneHost, SceneRenderer, ShapeSubtree};

/// Camera placement for a shape family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub position: Vec3,
    pub target: Vec3,
}

pub fn framing_for(family: ShapeFamily) -> CameraFraming {
    match family {
        // Mostly top-down so the flat shape reads without distortion
        ShapeFamily::Planar => CameraFraming {
            position: Vec3::new(0.0, 7.0, 3.0),
            target: Vec3::ZERO,
        },
        ShapeFamily::Solid => CameraFraming {
            position: Vec3::new(5.0, 4.0, 6.0),
            target: Vec3::new(0.0, 1.0, 0.0),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Host is not mounted; nothing was touched
    NotMounted,
    /// Same descriptor as the last applied one
    Unchanged,
    Rebuilt {
        /// `None` for an unknown shape id (empty scene)
        kind: Option<ShapeKind>,
        problems: Vec<ParameterError>,
    },
}

/// Applies descriptor changes to a mounted [`SceneHost`]
#[derive(Debug, Default)]
pub struct UpdateCoordinator {
    /// Mount id and descriptor of the last rebuild
    applied: Option<(u64, ShapeDescriptor)>,
    problems: Vec<ParameterError>,
    rebuilds: u64,
}

impl UpdateCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter problems found during the last rebuild
    pub fn problems(&self) -> &[ParameterError] {
        &self.problems
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Force the next [`update`](Self::update) to rebuild
    pub fn invalidate(&mut self) {
        self.applied = None;
    }

    /// Rebuild if `desc` differs from what the host currently shows
    pub fn update<R: SceneRenderer, L: LabelRenderer>(
        &mut self,
        host: &mut SceneHost<R, L>,
        desc: &ShapeDescriptor,
    ) -> UpdateOutcome {
        let mount_id = host.mount_id();
        let Some((scene, renderer, overlay)) = host.parts_mut() else {
            return UpdateOutcome::NotMounted;
        };
        if self
            .applied
            .as_ref()
            .is_some_and(|(id, last)| *id == mount_id && last == desc)
        {
            return UpdateOutcome::Unchanged;
        }

        let problems = desc.check_params();
        for problem in &problems {
            tracing::warn!("{}: {}", desc.shape, problem);
        }

        // 1. release the previous subtree
        if let Some(old) = scene.slot.take() {
            old.dispose(renderer);
        }
        // 2. release annotation lines and labels
        scene.annotations.clear(renderer, overlay);

        // 3-4. build and attach
        let kind = desc.kind();
        match (kind, build_shape(desc)) {
            (Some(kind), Some(built)) => {
                let subtree = ShapeSubtree::upload(kind, &built, renderer);
                scene.slot.attach(subtree, renderer);
                scene.annotations =
                    AnnotationSet::upload(&build_annotations(&built.anchors), renderer, overlay);

                // 5. reframe
                let framing = framing_for(kind.family());
                scene.camera.look_from(framing.position, framing.target);
                scene.controls.sync(&mut scene.camera);
                tracing::info!(
                    "Showing {} with {} dimension(s)",
                    kind,
                    scene.annotations.len()
                );
            }
            _ => tracing::info!("Unknown shape '{}'; scene left empty", desc.shape),
        }

        self.applied = Some((mount_id, desc.clone()));
        self.problems = problems.clone();
        self.rebuilds += 1;
        UpdateOutcome::Rebuilt { kind, problems }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_is_total() {
        for kind in ShapeKind::ALL {
            let f = framing_for(kind.family());
            assert!(f.position.is_finite() && f.target.is_finite());
            assert!(f.position.distance(f.target) > 1.0);
        }
    }

    #[test]
    fn test_planar_framing_looks_mostly_down() {
        let f = framing_for(ShapeFamily::Planar);
        let dir = (f.target - f.position).normalize();
        assert!(dir.y < -0.8);
        assert_eq!(f.target, Vec3::ZERO);
    }

    #[test]
    fn test_solid_framing_is_oblique_and_elevated() {
        let f = framing_for(ShapeFamily::Solid);
        assert!(f.target.y > 0.0);
        assert!(f.position.x > 0.0 && f.position.y > f.target.y && f.position.z > 0.0);
    }
}

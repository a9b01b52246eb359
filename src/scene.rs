//! The fixed desk scene as data.
//!
//! Each [`SceneObject`] names its texture and transform. The renderer walks
//! the list in order and issues one draw per entry, so the order here is the
//! draw order. All objects share the unit cube mesh.

use cgmath::{Matrix4, Rad};

use crate::data_structures::transform::{Composition, ModelTransform};

pub const WHITE_PLASTIC: &str = "WhitePlastic.png";
pub const METAL: &str = "metal.png";
pub const ERASER: &str = "Eraser.png";
pub const ERASER_BODY: &str = "EraserBody.png";
pub const CUTTING_MAT: &str = "CuttingMat.png";

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub name: &'static str,
    /// Texture file name inside the resources' `textures/` folder.
    pub texture: &'static str,
    pub transform: ModelTransform,
}

impl SceneObject {
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform.to_matrix()
    }
}

/// The plug (body and two prongs), the eraser (head and body) and the
/// cutting mat underneath.
///
/// Angles are radians. Most objects rotate about the world origin after
/// being translated (`R * T * S`); only the plug body uses `T * R * S`.
pub fn reference_scene() -> Vec<SceneObject> {
    use Composition::*;
    vec![
        SceneObject {
            name: "plug body",
            texture: WHITE_PLASTIC,
            transform: ModelTransform::new()
                .scale(1.0, 1.2, 1.0)
                .rotate(Rad(0.0), [0.0, 1.0, 0.2])
                .translate(0.0, -1.0, 0.0)
                .composed(TranslateRotateScale),
        },
        SceneObject {
            name: "prong one",
            texture: METAL,
            transform: ModelTransform::new()
                .scale(0.3, 0.8, 0.05)
                .rotate(Rad(0.0), [0.0, 1.3, 0.2])
                .translate(0.35, 0.1, -0.75)
                .composed(RotateTranslateScale),
        },
        SceneObject {
            name: "prong two",
            texture: METAL,
            transform: ModelTransform::new()
                .scale(0.3, 0.8, 0.05)
                .rotate(Rad(0.0), [0.0, 1.0, 0.2])
                .translate(0.35, 0.1, -0.2)
                .composed(RotateTranslateScale),
        },
        SceneObject {
            name: "eraser head",
            texture: ERASER,
            transform: ModelTransform::new()
                .scale(1.0, 0.9, 0.55)
                .rotate(Rad(15.0), [4.0, 7.0, -7.0])
                .translate(-3.5, -1.5, 1.1)
                .composed(RotateTranslateScale),
        },
        SceneObject {
            name: "eraser body",
            texture: ERASER_BODY,
            transform: ModelTransform::new()
                .scale(1.0, -2.5, 0.55)
                .rotate(Rad(15.0), [4.0, 7.0, -7.0])
                .translate(-3.5, -1.5, 1.1)
                .composed(RotateTranslateScale),
        },
        SceneObject {
            name: "cutting mat",
            texture: CUTTING_MAT,
            transform: ModelTransform::new()
                .scale(20.0, 20.0, 0.1)
                .rotate(Rad(90.0), [-0.5, 0.5, 0.5])
                .translate(-10.0, -10.0, -1.0)
                .composed(RotateTranslateScale),
        },
    ]
}

/// Force every object into `T * R * S` order.
pub fn normalize_composition(objects: &mut [SceneObject]) {
    for object in objects {
        object.transform = object.transform.normalized();
    }
}

/// Distinct texture files in first-use order.
pub fn texture_files(objects: &[SceneObject]) -> Vec<&'static str> {
    let mut files: Vec<&'static str> = Vec::new();
    for object in objects {
        if !files.contains(&object.texture) {
            files.push(object.texture);
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_draw_order() {
        let names: Vec<_> = reference_scene().iter().map(|o| o.name).collect();
        assert_eq!(
            names,
            vec![
                "plug body",
                "prong one",
                "prong two",
                "eraser head",
                "eraser body",
                "cutting mat"
            ]
        );
    }

    #[test]
    fn each_texture_is_listed_once() {
        assert_eq!(
            texture_files(&reference_scene()),
            vec![WHITE_PLASTIC, METAL, ERASER, ERASER_BODY, CUTTING_MAT]
        );
    }

    #[test]
    fn only_the_plug_body_uses_trs() {
        let scene = reference_scene();
        assert_eq!(scene[0].transform.composition, Composition::TranslateRotateScale);
        assert!(
            scene[1..]
                .iter()
                .all(|o| o.transform.composition == Composition::RotateTranslateScale)
        );
    }

    #[test]
    fn normalizing_keeps_unrotated_objects_in_place() {
        let original = reference_scene();
        let mut normalized = reference_scene();
        normalize_composition(&mut normalized);
        assert!(
            normalized
                .iter()
                .all(|o| o.transform.composition == Composition::TranslateRotateScale)
        );
        // With a zero angle both orders give the same matrix.
        for i in 0..3 {
            assert_eq!(original[i].model_matrix(), normalized[i].model_matrix());
        }
        assert_ne!(original[5].model_matrix(), normalized[5].model_matrix());
    }
}

// Static shape schemas: the named numeric dimensions each primitive needs.
// Read-only configuration; never mutated at runtime.

use serde::Serialize;

use crate::types::ShapeKind;

/// One numeric dimension of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// Ordered field list and icon for one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeSchema {
    pub shape: ShapeKind,
    pub icon: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ShapeSchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }
}

const fn field(key: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        placeholder,
    }
}

const SQUARE_FIELDS: &[FieldSpec] = &[field("side", "Side Length", "Enter side length")];

const RECTANGLE_FIELDS: &[FieldSpec] = &[
    field("length", "Length", "Enter length"),
    field("width", "Width", "Enter width"),
];

const CIRCLE_FIELDS: &[FieldSpec] = &[field("radius", "Radius", "Enter radius")];

const TRIANGLE_FIELDS: &[FieldSpec] = &[
    field("base", "Base", "Enter base"),
    field("height", "Height", "Enter height"),
    field("sideA", "Side A", "Enter side A"),
    field("sideB", "Side B", "Enter side B"),
    field("sideC", "Side C", "Enter side C"),
];

const PARALLELOGRAM_FIELDS: &[FieldSpec] = &[
    field("base", "Base", "Enter base"),
    field("height", "Height", "Enter height"),
    field("side", "Slanted Side", "Enter side length"),
];

static SCHEMAS: [ShapeSchema; 5] = [
    ShapeSchema {
        shape: ShapeKind::Square,
        icon: "fa-square",
        fields: SQUARE_FIELDS,
    },
    ShapeSchema {
        shape: ShapeKind::Rectangle,
        icon: "fa-rectangle-wide",
        fields: RECTANGLE_FIELDS,
    },
    ShapeSchema {
        shape: ShapeKind::Circle,
        icon: "fa-circle",
        fields: CIRCLE_FIELDS,
    },
    ShapeSchema {
        shape: ShapeKind::Triangle,
        icon: "fa-triangle",
        fields: TRIANGLE_FIELDS,
    },
    ShapeSchema {
        shape: ShapeKind::Parallelogram,
        icon: "fa-shapes",
        fields: PARALLELOGRAM_FIELDS,
    },
];

/// Schema for `shape`.
pub fn schema_for(shape: ShapeKind) -> &'static ShapeSchema {
    match shape {
        ShapeKind::Square => &SCHEMAS[0],
        ShapeKind::Rectangle => &SCHEMAS[1],
        ShapeKind::Circle => &SCHEMAS[2],
        ShapeKind::Triangle => &SCHEMAS[3],
        ShapeKind::Parallelogram => &SCHEMAS[4],
    }
}

/// Every schema, in selector order.
pub fn all_schemas() -> &'static [ShapeSchema] {
    &SCHEMAS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lookup_matches_shape() {
        for shape in ShapeKind::ALL {
            assert_eq!(schema_for(shape).shape, shape);
        }
        assert_eq!(all_schemas().len(), ShapeKind::ALL.len());
    }

    #[test]
    fn triangle_has_five_ordered_fields() {
        let keys: Vec<&str> = schema_for(ShapeKind::Triangle)
            .fields
            .iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(keys, ["base", "height", "sideA", "sideB", "sideC"]);
    }

    #[test]
    fn field_keys_are_unique_per_shape() {
        for schema in all_schemas() {
            let mut keys: Vec<&str> = schema.fields.iter().map(|f| f.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), schema.fields.len(), "{}", schema.shape);
        }
    }

    #[test]
    fn parallelogram_side_is_labelled_slanted() {
        let schema = schema_for(ShapeKind::Parallelogram);
        assert_eq!(schema.field("side").map(|f| f.label), Some("Slanted Side"));
        assert!(!schema.has_field("width"));
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Floorgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Floorgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::CellPos;

pub const MAX_PRODUCT_NAME_LEN: usize = 100;
pub const MAX_PRODUCT_ID_LEN: usize = 50;

/// Product details entered by the user, before a location is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub product_id: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub width_cm: f64,
    pub length_cm: f64,
}

/// A validated product pinned to a cell of a saved grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPlacement {
    pub grid_id: String,
    pub pos: CellPos,
    pub product: ProductDraft,
}

impl ProductDraft {
    /// Parses `name, id, weight, height, width, length`.
    pub fn parse(input: &str) -> Result<Self, ProductError> {
        let fields = input.split(',').map(str::trim).collect::<Vec<_>>();
        let [name, product_id, weight, height, width, length] = fields.as_slice() else {
            return Err(ProductError::FieldCount { found: fields.len() });
        };

        let draft = Self {
            name: (*name).to_owned(),
            product_id: (*product_id).to_owned(),
            weight_kg: parse_measure("weight", weight)?,
            height_cm: parse_measure("height", height)?,
            width_cm: parse_measure("width", width)?,
            length_cm: parse_measure("length", length)?,
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        check_text("product name", &self.name, MAX_PRODUCT_NAME_LEN)?;
        check_text("product id", &self.product_id, MAX_PRODUCT_ID_LEN)?;
        for (field, value) in [
            ("weight", self.weight_kg),
            ("height", self.height_cm),
            ("width", self.width_cm),
            ("length", self.length_cm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ProductError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ProductError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(ProductError::Length { field, len, max });
    }
    Ok(())
}

fn parse_measure(field: &'static str, raw: &str) -> Result<f64, ProductError> {
    raw.parse::<f64>().map_err(|_| ProductError::NotANumber { field, raw: raw.to_owned() })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductError {
    FieldCount { found: usize },
    NotANumber { field: &'static str, raw: String },
    NonPositive { field: &'static str, value: f64 },
    Length { field: &'static str, len: usize, max: usize },
}

impl fmt::Display for ProductError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { found } => write!(
                f,
                "expected 6 comma-separated fields (name, id, weight, height, width, length), got {found}"
            ),
            Self::NotANumber { field, raw } => write!(f, "{field} is not a number: {raw:?}"),
            Self::NonPositive { field, value } => write!(f, "{field} must be positive (got {value})"),
            Self::Length { field, len, max } => {
                write!(f, "{field} must be 1..={max} characters (got {len})")
            }
        }
    }
}

impl std::error::Error for ProductError {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ProductDraft, ProductError};

    #[test]
    fn parses_trimmed_fields() {
        let draft = ProductDraft::parse(" Widget A , WDG001, 2.5, 15, 10, 8 ").expect("draft");
        assert_eq!(draft.name, "Widget A");
        assert_eq!(draft.product_id, "WDG001");
        assert_eq!(draft.weight_kg, 2.5);
        assert_eq!(draft.length_cm, 8.0);
    }

    #[rstest]
    #[case("Widget, WDG001, 2.5", ProductError::FieldCount { found: 3 })]
    #[case("Widget, WDG001, heavy, 1, 1, 1", ProductError::NotANumber { field: "weight", raw: "heavy".to_owned() })]
    #[case("Widget, WDG001, 1, 0, 1, 1", ProductError::NonPositive { field: "height", value: 0.0 })]
    #[case(", WDG001, 1, 1, 1, 1", ProductError::Length { field: "product name", len: 0, max: 100 })]
    fn rejects_bad_input(#[case] input: &str, #[case] expected: ProductError) {
        assert_eq!(ProductDraft::parse(input).unwrap_err(), expected);
    }
}

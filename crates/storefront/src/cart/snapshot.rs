//! Validation of stored cart lines.

use std::str::FromStr;

use nexis_core::{CartLineItem, ProductId, RawProductId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};

use crate::persistence::{InvalidElement, SnapshotElement};

impl SnapshotElement for CartLineItem {
    fn from_snapshot_value(value: Value) -> Result<Self, InvalidElement> {
        let Value::Object(fields) = value else {
            return Err(InvalidElement::NotAnObject);
        };

        let id = match fields.get("id") {
            Some(Value::Number(n)) => RawProductId::Number(n.clone()),
            Some(Value::String(s)) => RawProductId::Text(s.clone()),
            Some(_) => {
                return Err(InvalidElement::WrongType {
                    field: "id",
                    expected: "a number or string",
                });
            }
            None => return Err(InvalidElement::MissingField("id")),
        };
        let id = ProductId::canonicalize(id)?;

        let name = required_string(&fields, "name")?;
        let price = required_number(&fields, "price")?;
        if price < Decimal::ZERO {
            return Err(InvalidElement::OutOfRange("price"));
        }
        let image = required_string(&fields, "image")?;

        let quantity = required_number(&fields, "quantity")?;
        if !quantity.fract().is_zero() {
            return Err(InvalidElement::WrongType {
                field: "quantity",
                expected: "an integer",
            });
        }
        let quantity = quantity
            .to_u32()
            .filter(|q| *q >= 1)
            .ok_or(InvalidElement::OutOfRange("quantity"))?;

        Ok(Self {
            id,
            name,
            price,
            image,
            quantity,
        })
    }
}

fn required_string(fields: &Map<String, Value>, field: &'static str) -> Result<String, InvalidElement> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(InvalidElement::WrongType {
            field,
            expected: "a string",
        }),
        None => Err(InvalidElement::MissingField(field)),
    }
}

fn required_number(fields: &Map<String, Value>, field: &'static str) -> Result<Decimal, InvalidElement> {
    match fields.get(field) {
        Some(Value::Number(n)) => number_to_decimal(n).ok_or(InvalidElement::OutOfRange(field)),
        Some(_) => Err(InvalidElement::WrongType {
            field,
            expected: "a number",
        }),
        None => Err(InvalidElement::MissingField(field)),
    }
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Collapse lines that share a canonical ID, summing their quantities.
///
/// Snapshots written by older builds may hold `7` and `"7"` as separate
/// lines; the first occurrence keeps its name, price and image.
pub(super) fn merge_duplicate_lines(lines: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(existing) = merged.iter_mut().find(|l| l.id == line.id) {
            tracing::warn!(id = %line.id, "Merging duplicate cart line from snapshot");
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            merged.push(line);
        }
    }
    merged
}

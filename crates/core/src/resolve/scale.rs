use std::fmt;

use preset_diff_tables::{ParamDef, ParamTable, item_list_name};
use serde::Serialize;

use crate::error::DomainError;

/// A human-meaningful parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    /// A discrete item label.
    Label(String),
    /// A numeric passthrough value.
    Integer(i64),
    /// A continuous value, rounded to one decimal place.
    Number(f64),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Label(s) => f.write_str(s),
            DisplayValue::Integer(n) => write!(f, "{n}"),
            DisplayValue::Number(x) => write!(f, "{x:.1}"),
        }
    }
}

/// A resolved parameter display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    /// Human-readable parameter name, when the definition declares one.
    pub display_name: Option<String>,
    /// The display value.
    pub value: DisplayValue,
}

/// Outcome of looking a parameter up.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// A definition matched.
    Found(Resolved),
    /// No definition with that name.
    NoMatch,
}

impl Lookup {
    /// The resolved display, if any.
    pub fn found(self) -> Option<Resolved> {
        match self {
            Lookup::Found(r) => Some(r),
            Lookup::NoMatch => None,
        }
    }
}

/// Index of `normalized` into a set of `count` items:
/// `round(normalized × (count − 1))`, ties to even.
pub fn index_for(normalized: f64, count: usize) -> Result<usize, DomainError> {
    if !(0.0..=1.0).contains(&normalized) {
        return Err(DomainError::OutOfRange(normalized));
    }
    if count == 0 {
        return Err(DomainError::EmptyItems);
    }
    let index = (normalized * (count - 1) as f64).round_ties_even() as usize;
    Ok(index.min(count - 1))
}

/// Map `normalized` linearly into `[min, max]`.
pub fn scale_linear(normalized: f64, min: f64, max: f64) -> f64 {
    min + (max - min) * normalized
}

/// Round to one decimal place.
fn round_tenths(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

/// Percent change from `default` to `current`, rounded to an integer.
///
/// `None` when the default is zero.
pub fn percent_change(current: f64, default: f64) -> Option<i64> {
    if default == 0.0 {
        return None;
    }
    Some((((current - default) / default) * 100.0).round_ties_even() as i64)
}

/// Resolve `key` against one table.
///
/// Strategy precedence: discrete items (numeric passthrough when the first item
/// carries a `from` marker), then the `{key}_V{version}` item list, then linear
/// scaling. Returns [`Lookup::NoMatch`] if the table has no such parameter.
pub fn resolve_in_table(
    table: &ParamTable,
    key: &str,
    normalized: f64,
    version: &str,
) -> Result<Lookup, DomainError> {
    let Some(def) = table.param(key) else {
        return Ok(Lookup::NoMatch);
    };
    let value = display_value(table, def, normalized, version)?;
    Ok(Lookup::Found(Resolved {
        display_name: def.display_name.clone(),
        value,
    }))
}

fn display_value(
    table: &ParamTable,
    def: &ParamDef,
    normalized: f64,
    version: &str,
) -> Result<DisplayValue, DomainError> {
    let (min, max) = def.mapping();
    let scaled = scale_linear(normalized, min, max);

    if !def.items.is_empty() {
        if def.is_passthrough() {
            return Ok(DisplayValue::Integer(scaled.round_ties_even() as i64));
        }
        let item = &def.items[index_for(normalized, def.items.len())?];
        return Ok(DisplayValue::Label(item.text.clone().unwrap_or_default()));
    }

    let list_name = item_list_name(&def.name, version);
    if def.references_list(&list_name)
        && let Some(labels) = table.item_list(&list_name).filter(|l| !l.is_empty())
    {
        let label = &labels[index_for(normalized, labels.len())?];
        return Ok(DisplayValue::Label(label.clone()));
    }

    if def.has_explicit_mapping() {
        Ok(DisplayValue::Number(round_tenths(scaled)))
    } else {
        Ok(DisplayValue::Number(round_tenths(scaled * 100.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preset_diff_tables::{Item, ItemList};

    fn labelled(name: &str, labels: &[&str]) -> ParamDef {
        ParamDef {
            items: labels.iter().map(|l| Item::labelled(*l)).collect(),
            ..ParamDef::new(name)
        }
    }

    #[test]
    fn index_bounds() {
        for n in 1..=8 {
            assert_eq!(index_for(0.0, n), Ok(0));
            assert_eq!(index_for(1.0, n), Ok(n - 1));
            for step in 0..=20 {
                let i = index_for(step as f64 / 20.0, n).unwrap();
                assert!(i < n, "index {i} out of range for {n} items");
            }
        }
    }

    #[test]
    fn index_rounds_half_to_even() {
        assert_eq!(index_for(0.5, 2), Ok(0));
        assert_eq!(index_for(0.5, 4), Ok(2));
        assert_eq!(index_for(0.34, 4), Ok(1));
    }

    #[test]
    fn index_domain_errors() {
        assert_eq!(index_for(-0.1, 3), Err(DomainError::OutOfRange(-0.1)));
        assert_eq!(index_for(1.5, 3), Err(DomainError::OutOfRange(1.5)));
        assert!(matches!(index_for(f64::NAN, 3), Err(DomainError::OutOfRange(_))));
        assert_eq!(index_for(0.5, 0), Err(DomainError::EmptyItems));
    }

    #[test]
    fn discrete_items() {
        let table = ParamTable::new(vec![labelled("Mode", &["Off", "Low", "Mid", "High"])], vec![]);
        let r = resolve_in_table(&table, "Mode", 0.34, "1.9.0").unwrap();
        assert_eq!(
            r.found().map(|r| r.value),
            Some(DisplayValue::Label("Low".into()))
        );
    }

    #[test]
    fn discrete_out_of_range_is_domain_error() {
        let table = ParamTable::new(vec![labelled("Mode", &["A", "B"])], vec![]);
        assert!(resolve_in_table(&table, "Mode", 2.0, "1.9.0").is_err());
    }

    #[test]
    fn passthrough_rounds_scaled_value() {
        let def = ParamDef {
            mapping_min: Some(0.0),
            mapping_max: Some(127.0),
            items: vec![Item {
                text: None,
                from: Some(0.0),
            }],
            ..ParamDef::new("Note")
        };
        let table = ParamTable::new(vec![def], vec![]);
        let r = resolve_in_table(&table, "Note", 0.5, "1.9.0").unwrap().found().unwrap();
        // 63.5 rounds to the even neighbour.
        assert_eq!(r.value, DisplayValue::Integer(64));
    }

    #[test]
    fn item_list_reference() {
        let def = ParamDef {
            item_lists: vec!["Osc_Type_V1.9.0".into()],
            ..ParamDef::new("Osc_Type")
        };
        let lists = vec![ItemList {
            name: "Osc_Type_V1.9.0".into(),
            items: vec!["Basic".into(), "Saw".into(), "Harmo".into()],
        }];
        let table = ParamTable::new(vec![def], lists);
        let r = resolve_in_table(&table, "Osc_Type", 1.0, "1.9.0").unwrap().found().unwrap();
        assert_eq!(r.value, DisplayValue::Label("Harmo".into()));

        // Another version has no reference: falls back to the percentage display.
        let r = resolve_in_table(&table, "Osc_Type", 1.0, "2.0.0").unwrap().found().unwrap();
        assert_eq!(r.value, DisplayValue::Number(100.0));
    }

    #[test]
    fn items_take_precedence_over_item_list() {
        let def = ParamDef {
            item_lists: vec!["Filter_V1.9.0".into()],
            ..labelled("Filter", &["LP", "BP", "HP"])
        };
        let lists = vec![ItemList {
            name: "Filter_V1.9.0".into(),
            items: vec!["Ladder".into(), "SEM".into(), "Comb".into()],
        }];
        let table = ParamTable::new(vec![def], lists);
        let r = resolve_in_table(&table, "Filter", 0.5, "1.9.0").unwrap().found().unwrap();
        assert_eq!(r.value, DisplayValue::Label("BP".into()));
    }

    #[test]
    fn empty_or_missing_item_list_falls_back_to_linear() {
        let def = ParamDef {
            mapping_min: Some(0.0),
            mapping_max: Some(10.0),
            item_lists: vec!["Wave_V1.9.0".into()],
            ..ParamDef::new("Wave")
        };
        let empty = vec![ItemList {
            name: "Wave_V1.9.0".into(),
            items: vec![],
        }];

        let table = ParamTable::new(vec![def.clone()], empty);
        let r = resolve_in_table(&table, "Wave", 0.5, "1.9.0").unwrap().found().unwrap();
        assert_eq!(r.value, DisplayValue::Number(5.0));

        let table = ParamTable::new(vec![def], vec![]);
        let r = resolve_in_table(&table, "Wave", 0.5, "1.9.0").unwrap().found().unwrap();
        assert_eq!(r.value, DisplayValue::Number(5.0));
    }

    #[test]
    fn explicit_mapping_scales_linearly() {
        let def = ParamDef {
            display_name: Some("Cutoff".into()),
            mapping_min: Some(20.0),
            mapping_max: Some(20000.0),
            ..ParamDef::new("Cutoff")
        };
        let table = ParamTable::new(vec![def], vec![]);
        let r = resolve_in_table(&table, "Cutoff", 0.5, "1.9.0").unwrap().found().unwrap();
        assert_eq!(r.display_name.as_deref(), Some("Cutoff"));
        assert_eq!(r.value, DisplayValue::Number(10010.0));
        assert_eq!(r.value.to_string(), "10010.0");
    }

    #[test]
    fn implicit_mapping_displays_percentage() {
        let table = ParamTable::new(vec![ParamDef::new("Level")], vec![]);
        let r = resolve_in_table(&table, "Level", 0.1234, "1.9.0").unwrap().found().unwrap();
        assert_eq!(r.value, DisplayValue::Number(12.3));
    }

    #[test]
    fn unknown_key_is_no_match() {
        let table = ParamTable::new(vec![ParamDef::new("Level")], vec![]);
        assert_eq!(
            resolve_in_table(&table, "Other", 0.5, "1.9.0"),
            Ok(Lookup::NoMatch)
        );
    }

    #[test]
    fn percent_change_cases() {
        assert_eq!(percent_change(50.0, 40.0), Some(25));
        assert_eq!(percent_change(0.0, 0.5), Some(-100));
        assert_eq!(percent_change(0.5, 0.0), None);
    }
}

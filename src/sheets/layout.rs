use super::cell::Record;
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Rows,
    Columns,
}

impl Dimension {
    pub(crate) fn as_api_str(&self) -> &'static str {
        match self {
            Dimension::Rows => "ROWS",
            Dimension::Columns => "COLUMNS",
        }
    }
}

/// Where every value of a header-keyed update goes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderPlan {
    /// Headers missing from the sheet, to be written right after the existing ones.
    pub new_headers: Vec<String>,
    /// 1-based position of the first new header.
    pub first_new_header: u32,
    /// One line per record. `None` cells and empty lines are left untouched.
    pub values: Vec<Vec<Option<Value>>>,
}

/// Lay out records against the existing headers.
///
/// Keys are matched in the order the headers appear; unknown keys are
/// appended as new headers in first-seen order. A `None` record keeps its
/// slot so that following records still land on consecutive lines.
pub fn plan_by_header(
    headers: &[String],
    records: &[Option<Record>],
    case_sensitive: bool,
) -> Result<HeaderPlan> {
    let normalize = |s: &str| match case_sensitive {
        true => s.to_string(),
        false => s.to_lowercase(),
    };

    let mut known: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
    let mut new_headers = Vec::new();
    let mut values = Vec::with_capacity(records.len());

    for record in records {
        let Some(record) = record else {
            values.push(Vec::new());
            continue;
        };

        let mut positioned = BTreeMap::new();
        for (key, value) in record {
            let wanted = normalize(key);
            let index = match known.iter().position(|h| *h == wanted) {
                Some(index) => index,
                None => {
                    known.push(wanted);
                    new_headers.push(key.clone());
                    known.len() - 1
                }
            };
            positioned.insert(index, value.to_json()?);
        }

        let width = positioned.keys().next_back().map_or(0, |last| last + 1);
        let mut line = vec![None; width];
        for (index, value) in positioned {
            line[index] = Some(value);
        }
        values.push(line);
    }

    Ok(HeaderPlan {
        new_headers,
        first_new_header: headers.len() as u32 + 1,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::cell::CellValue;
    use serde_json::json;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_values_follow_headers() {
        let plan = plan_by_header(
            &headers(&["colA", "colB", "", "colD"]),
            &[Some(record(&[("colB", "b"), ("colA", "a"), ("colE", "e")]))],
            true,
        )
        .unwrap();

        assert_eq!(plan.new_headers, vec!["colE"]);
        assert_eq!(plan.first_new_header, 5);
        assert_eq!(
            plan.values,
            vec![vec![Some(json!("a")), Some(json!("b")), None, None, Some(json!("e"))]]
        );
    }

    #[test]
    fn test_case_insensitive_matching() {
        let plan = plan_by_header(
            &headers(&["Hello", "you", "Crazy", "person"]),
            &[Some(record(&[
                ("hello", "1"),
                ("You", "2"),
                ("crazy", "3"),
                ("Person", "4"),
            ]))],
            false,
        )
        .unwrap();

        assert!(plan.new_headers.is_empty());
        assert_eq!(plan.values[0].len(), 4);
        assert!(plan.values[0].iter().all(Option::is_some));
    }

    #[test]
    fn test_case_sensitive_adds_header() {
        let plan = plan_by_header(&headers(&["Name"]), &[Some(record(&[("name", "x")]))], true)
            .unwrap();

        assert_eq!(plan.new_headers, vec!["name"]);
        assert_eq!(plan.values, vec![vec![None, Some(json!("x"))]]);
    }

    #[test]
    fn test_new_header_shared_between_records() {
        let plan = plan_by_header(
            &[],
            &[
                Some(record(&[("colA", "a"), ("colC", "c")])),
                None,
                Some(record(&[("colC", "c2"), ("colD", "d")])),
            ],
            true,
        )
        .unwrap();

        assert_eq!(plan.new_headers, vec!["colA", "colC", "colD"]);
        assert_eq!(plan.first_new_header, 1);
        assert_eq!(plan.values.len(), 3);
        assert!(plan.values[1].is_empty());
        assert_eq!(
            plan.values[2],
            vec![None, Some(json!("c2")), Some(json!("d"))]
        );
    }

    #[test]
    fn test_typed_values() {
        let mut r = Record::new();
        r.insert("n".to_string(), CellValue::Integer(1));
        r.insert("b".to_string(), CellValue::Bool(false));

        let plan = plan_by_header(&headers(&["b", "n"]), &[Some(r)], true).unwrap();
        assert_eq!(plan.values[0], vec![Some(json!(false)), Some(json!(1))]);
    }

    #[test]
    fn test_nested_value_rejected() {
        let mut r = Record::new();
        r.insert("n".to_string(), CellValue::Nested(vec![]));

        assert!(plan_by_header(&[], &[Some(r)], true).is_err());
    }
}

//! Property block encoder: SD data items following the connection table.

use crate::io::config::PropertyFilter;
use crate::io::error::Error;
use crate::model::property::{Property, PropertyMap};
use std::io::Write;

pub const RECORD_DELIMITER: &str = "$$$$";

/// Resolves the filter against one molecule's properties. Explicit names come
/// out in the requested order, once each; names the molecule lacks are
/// skipped.
pub fn select<'a>(properties: &'a PropertyMap, filter: &PropertyFilter) -> Vec<&'a Property> {
    match filter {
        PropertyFilter::AllPublic => properties.public().collect(),
        PropertyFilter::Names(names) => {
            let mut selected: Vec<&Property> = Vec::with_capacity(names.len());
            for name in names {
                if selected.iter().any(|p| &p.name == name) {
                    continue;
                }
                match properties.get(name) {
                    Some(prop) => selected.push(prop),
                    None => tracing::debug!(name = %name, "requested property not present, skipping"),
                }
            }
            selected
        }
    }
}

pub fn write_properties<W: Write>(
    mut writer: W,
    properties: &PropertyMap,
    filter: &PropertyFilter,
) -> Result<(), Error> {
    for prop in select(properties, filter) {
        let value = prop.value.to_string();
        check_name(&prop.name)?;
        check_value(&prop.name, &value)?;
        writeln!(writer, ">  <{}>", prop.name)?;
        writeln!(writer, "{}", value)?;
        writeln!(writer)?;
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), Error> {
    let field = || format!("property name {name:?}");
    if has_line_break(name) {
        return Err(Error::format(field(), "contains a line break"));
    }
    if name.contains(['<', '>']) {
        return Err(Error::format(field(), "contains an angle bracket"));
    }
    Ok(())
}

fn check_value(name: &str, value: &str) -> Result<(), Error> {
    let field = || format!("property {name:?}");
    if has_line_break(value) {
        return Err(Error::format(field(), "value contains a line break"));
    }
    if starts_with_delimiter(value) {
        return Err(Error::format(field(), "value starts with the record delimiter"));
    }
    Ok(())
}

pub(crate) fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Readers end a record on any line beginning with `$$$$`, so no content
/// line may start with it.
pub(crate) fn starts_with_delimiter(line: &str) -> bool {
    line.starts_with(RECORD_DELIMITER)
}

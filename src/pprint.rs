use crate::mapping::Representation;
use crate::mapping_type::MappingType;

use prettytable::{self, format, row, Cell, Row};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum TablePrintStyle {
    Full,
    Compact,
}

/// Pretty-print all [MappingType]s to stdout.
pub fn pprint_taxonomy(style: TablePrintStyle) {
    taxonomy_table(style).printstd();
}

/// Pretty-print all [MappingType]s to a given [fmt::Write].
pub fn pprint_write<W: fmt::Write>(out: &mut W, style: TablePrintStyle) -> fmt::Result {
    write!(out, "{}", taxonomy_table(style))
}

pub fn pprint_string(style: TablePrintStyle) -> String {
    format!("{}", taxonomy_table(style))
}

/// Pretty-print the constraints and derived properties of a single [MappingType] to stdout.
pub fn pprint_type(mapping_type: MappingType) {
    type_table(mapping_type).printstd();
}

pub fn pprint_type_string(mapping_type: MappingType) -> String {
    format!("{}", type_table(mapping_type))
}

fn taxonomy_table(style: TablePrintStyle) -> prettytable::Table {
    let mut table = prettytable::Table::new();
    let titles = match style {
        TablePrintStyle::Full => row![
            "Ordinal",
            "Type",
            "Source",
            "Target",
            "Inverse",
            "Function",
            "Partial",
            "Surjection",
            "Injection",
            "Bijection",
            "Representation"
        ],
        TablePrintStyle::Compact => row!["Ordinal", "Type", "Source", "Target", "Inverse"],
    };
    table.set_titles(titles);

    for mapping_type in MappingType::all() {
        let mut r = row![
            mapping_type.ordinal(),
            mapping_type,
            mapping_type.source_cardinality(),
            mapping_type.target_cardinality(),
            mapping_type.inverse()
        ];
        if style == TablePrintStyle::Full {
            for flag in [
                mapping_type.is_function(),
                mapping_type.is_partial_function(),
                mapping_type.is_surjection(),
                mapping_type.is_injection(),
                mapping_type.is_bijection(),
            ] {
                r.add_cell(Cell::new(check(flag)));
            }
            r.add_cell(Cell::new(&Representation::for_type(mapping_type).to_string()));
        }
        table.add_row(r);
    }

    table.set_format(compact_format());
    table
}

fn type_table(mapping_type: MappingType) -> prettytable::Table {
    let mut table = prettytable::Table::new();
    table.set_titles(row![
        "",
        format!("{mapping_type} ({})", mapping_type.ordinal())
    ]);
    let properties: [(&str, String); 4] = [
        ("Sources per target", mapping_type.source_cardinality().to_string()),
        ("Targets per source", mapping_type.target_cardinality().to_string()),
        ("Inverse", mapping_type.inverse().to_string()),
        (
            "Representation",
            Representation::for_type(mapping_type).to_string(),
        ),
    ];
    for (name, value) in properties {
        table.add_row(row![name, value]);
    }
    let predicates = [
        ("Function", mapping_type.is_function()),
        ("Partial function", mapping_type.is_partial_function()),
        ("Surjection", mapping_type.is_surjection()),
        ("Injection", mapping_type.is_injection()),
        ("Bijection", mapping_type.is_bijection()),
        ("Optional source", mapping_type.is_optional_source()),
        ("Multiple source", mapping_type.is_multiple_source()),
        ("Optional target", mapping_type.is_optional_target()),
        ("Multiple target", mapping_type.is_multiple_target()),
    ];
    for (name, value) in predicates {
        table.add_row(Row::new(vec![Cell::new(name), Cell::new(check(value))]));
    }
    table.set_format(compact_format());
    table
}

fn compact_format() -> format::TableFormat {
    format::FormatBuilder::new()
        .separator(
            format::LinePosition::Title,
            format::LineSeparator::new('-', ' ', ' ', ' '),
        )
        .column_separator(' ')
        .build()
}

fn check(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}

//! Column types accepted by the target engine.

use std::collections::HashMap;

/// Length given to a `varchar` declared without one.
pub const DEFAULT_VARCHAR_LENGTH: u32 = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeFamily {
    Integer,
    Numeric,
    Text,
    Binary,
    Temporal,
    /// `enum` and `set`, whose arguments are quoted member lists.
    Enumerated,
}

/// Argument list a base type may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arguments {
    None,
    /// `(n)` with `n >= 1`: display width, character or byte length.
    Length,
    /// `(fsp)` with `fsp` in `0..=6`.
    FractionalSeconds,
    /// `(p)` or `(p,s)` with `p >= 1` and `s <= p`.
    PrecisionScale,
    /// `('a','b',...)`, required.
    Members,
}

/// Upper bound on fractional seconds precision.
const MAX_FSP: u32 = 6;

lazy_static! {
    static ref TYPE_CATALOG: HashMap<&'static str, (TypeFamily, Arguments)> = {
        use Arguments::*;
        use TypeFamily::*;
        [
            ("int", (Integer, Length)),
            ("tinyint", (Integer, Length)),
            ("smallint", (Integer, Length)),
            ("mediumint", (Integer, Length)),
            ("bigint", (Integer, Length)),
            ("bit", (Integer, Length)),
            ("decimal", (Numeric, PrecisionScale)),
            ("float", (Numeric, Length)),
            ("double", (Numeric, None)),
            ("char", (Text, Length)),
            ("varchar", (Text, Length)),
            ("tinytext", (Text, None)),
            ("text", (Text, None)),
            ("mediumtext", (Text, None)),
            ("longtext", (Text, None)),
            ("binary", (Binary, Length)),
            ("varbinary", (Binary, Length)),
            ("tinyblob", (Binary, None)),
            ("blob", (Binary, Length)),
            ("mediumblob", (Binary, None)),
            ("longblob", (Binary, None)),
            ("date", (Temporal, None)),
            ("datetime", (Temporal, FractionalSeconds)),
            ("time", (Temporal, FractionalSeconds)),
            ("timestamp", (Temporal, FractionalSeconds)),
            ("year", (Temporal, None)),
            ("enum", (Enumerated, Members)),
            ("set", (Enumerated, Members)),
        ]
        .into_iter()
        .collect()
    };
}

/// Base type names in the catalog, sorted.
pub fn catalog_types() -> Vec<&'static str> {
    let mut names = TYPE_CATALOG.keys().copied().collect::<Vec<_>>();
    names.sort_unstable();
    names
}

pub fn type_family(base: &str) -> Option<TypeFamily> {
    TYPE_CATALOG.get(base).map(|(family, _)| *family)
}

pub fn type_arguments(base: &str) -> Option<Arguments> {
    TYPE_CATALOG.get(base).map(|(_, arguments)| *arguments)
}

/// Split `name(args)` into the trimmed base name and the argument suffix.
fn split_type(raw: &str) -> (&str, &str) {
    match raw.find('(') {
        Some(pos) => (raw[..pos].trim(), raw[pos..].trim()),
        None => (raw.trim(), ""),
    }
}

/// Lower-cases the base type name and gives a bare `varchar` its default length.
///
/// Arguments are kept as written so `enum` members keep their case.
pub fn normalize(raw: &str) -> String {
    let (base, suffix) = split_type(raw.trim());
    let base = base.to_lowercase();

    if base == "varchar" && suffix.is_empty() {
        return format!("{}({})", base, DEFAULT_VARCHAR_LENGTH);
    }

    format!("{}{}", base, suffix)
}

/// Checks a normalized type against the catalog, including the shape of its arguments.
pub fn is_valid(normalized: &str) -> bool {
    let (base, suffix) = split_type(normalized);
    let Some(arguments) = type_arguments(base) else {
        return false;
    };

    if suffix.is_empty() {
        return arguments != Arguments::Members;
    }

    let Some(args) = suffix
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return false;
    };

    match arguments {
        Arguments::None => false,
        Arguments::Length => matches!(numbers(args).as_deref(), Some([n]) if *n >= 1),
        Arguments::FractionalSeconds => {
            matches!(numbers(args).as_deref(), Some([fsp]) if *fsp <= MAX_FSP)
        }
        Arguments::PrecisionScale => match numbers(args).as_deref() {
            Some([p]) => *p >= 1,
            Some([p, s]) => *p >= 1 && s <= p,
            _ => false,
        },
        Arguments::Members => valid_members(args),
    }
}

/// Comma separated unsigned integers.
fn numbers(args: &str) -> Option<Vec<u32>> {
    args.split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            part.parse().ok()
        })
        .collect()
}

/// `'a','b',...` with at least one member.
fn valid_members(args: &str) -> bool {
    let mut members = 0;
    let mut chars = args.trim().chars().peekable();

    loop {
        if chars.next() != Some('\'') {
            return false;
        }
        loop {
            match chars.next() {
                Some('\'') if chars.peek() == Some(&'\'') => {
                    chars.next();
                }
                Some('\'') => break,
                Some(_) => {}
                None => return false,
            }
        }
        members += 1;

        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => return members > 0,
            Some(',') => {
                while chars.peek().map_or(false, |c| c.is_whitespace()) {
                    chars.next();
                }
            }
            Some(_) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_type_is_valid_after_normalize() {
        for name in catalog_types() {
            if type_arguments(name) == Some(Arguments::Members) {
                continue;
            }
            assert!(is_valid(&normalize(name)), "{} rejected", name);
            assert!(
                is_valid(&normalize(&name.to_uppercase())),
                "{} rejected",
                name.to_uppercase()
            );
        }
    }

    #[test]
    fn test_families() {
        assert_eq!(type_family("bigint"), Some(TypeFamily::Integer));
        assert_eq!(type_family("double"), Some(TypeFamily::Numeric));
        assert_eq!(type_family("set"), Some(TypeFamily::Enumerated));
        assert_eq!(type_family("uuid"), None);
        assert_eq!(type_arguments("decimal"), Some(Arguments::PrecisionScale));
        assert_eq!(type_arguments("year"), Some(Arguments::None));
    }

    #[test]
    fn test_unknown_types_are_invalid() {
        for name in ["uuid", "jsonb", "integer", "string", "", "varchar2", "int unsigned"] {
            assert!(!is_valid(&normalize(name)), "{} accepted", name);
        }
    }

    #[test]
    fn test_varchar_gets_default_length() {
        assert_eq!(normalize("varchar"), "varchar(255)");
        assert_eq!(normalize("VARCHAR"), "varchar(255)");
        assert_eq!(normalize("varchar(40)"), "varchar(40)");
        assert_eq!(normalize(" VarChar (40) "), "varchar(40)");
        assert_eq!(normalize("char"), "char");
    }

    #[test]
    fn test_arguments() {
        assert!(is_valid("decimal(10,2)"));
        assert!(is_valid("decimal(10, 2)"));
        assert!(is_valid("int(11)"));
        assert!(!is_valid("decimal(10,2,3)"));
        assert!(!is_valid("varchar(abc)"));
        assert!(!is_valid("varchar(255"));
        assert!(!is_valid("varchar()"));

        assert!(is_valid("enum('small','large')"));
        assert!(is_valid("set('a', 'it''s')"));
        assert!(!is_valid("enum()"));
        assert!(!is_valid("enum(1,2)"));
        assert!(!is_valid("enum('open"));
        assert!(!is_valid("enum"));
        assert!(!is_valid("set"));
    }

    #[test]
    fn test_arguments_follow_the_type() {
        for accepted in [
            "varchar(1)",
            "char(10)",
            "bit(8)",
            "blob(1024)",
            "float(7)",
            "decimal(5)",
            "decimal(5,5)",
            "datetime(6)",
            "time(0)",
            "timestamp(3)",
        ] {
            assert!(is_valid(accepted), "{} rejected", accepted);
        }

        for rejected in [
            "varchar(10,2)",
            "date(5,5)",
            "int(3,1)",
            "year(4,4)",
            "year(4)",
            "text(1,2)",
            "blob(9,9)",
            "char(0)",
            "varchar(0)",
            "float(7,3)",
            "double(8,2)",
            "double(8)",
            "datetime(7)",
            "decimal(0)",
            "decimal(2,5)",
            "int(99999999999)",
            "date('a')",
        ] {
            assert!(!is_valid(rejected), "{} accepted", rejected);
        }
    }

    #[test]
    fn test_enum_members_keep_case() {
        assert_eq!(normalize("ENUM('Red','Blue')"), "enum('Red','Blue')");
    }
}

//! Declarative helpers for string-backed enums.

/// Implement `Display` and a case-insensitive `FromStr` for a fieldless enum.
///
/// Unknown input maps to `$error_variant(input)`.
///
/// ```rust,ignore
/// enum_display_fromstr!(ExportFormat, QaError::InvalidExportFormat, {
///     Csv => "csv",
///     Table => "table",
/// });
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        $crate::enum_display!($enum_name, { $($variant => $str),+ });

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::QaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_lowercase();
                $(
                    if lowered == $str {
                        return Ok($enum_name::$variant);
                    }
                )+
                Err($error_variant(s.to_string()))
            }
        }
    };
}

/// Implement `Display` for a fieldless enum from a variant-to-label table.
#[macro_export]
macro_rules! enum_display {
    (
        $enum_name:ident,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $($enum_name::$variant => $str,)+
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::error::QaError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Verdict {
        Accepted,
        Rejected,
    }

    enum_display_fromstr!(Verdict, QaError::InvalidInput, {
        Accepted => "accepted",
        Rejected => "rejected",
    });

    #[derive(Debug)]
    enum Shade {
        Light,
        Dark,
    }

    enum_display!(Shade, { Light => "Light shade", Dark => "Dark shade" });

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Shade::Light.to_string(), "Light shade");
        assert_eq!(Shade::Dark.to_string(), "Dark shade");
        assert_eq!(Verdict::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_from_str_ignores_case_and_whitespace() {
        assert_eq!(" ACCEPTED ".parse::<Verdict>().unwrap(), Verdict::Accepted);
        assert_eq!("Rejected".parse::<Verdict>().unwrap(), Verdict::Rejected);
    }

    #[test]
    fn test_from_str_unknown_keeps_input() {
        match "maybe".parse::<Verdict>() {
            Err(QaError::InvalidInput(raw)) => assert_eq!(raw, "maybe"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

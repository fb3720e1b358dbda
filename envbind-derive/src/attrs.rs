//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates binding attributes from struct fields
//! during macro expansion.

use syn::{Field, Lit, Visibility};

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Environment variable name.
    ///
    /// `None` means the field is only recursed into if it is a record. An
    /// empty name is kept so the binder can report it.
    pub name: Option<String>,

    /// Leave the field out of the descriptor table.
    pub skip: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[env(...)]` attributes from a struct field.
    ///
    /// Attributes other than `env` are ignored so other macros can use them.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // name = "..."
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    let Lit::Str(s) = lit else {
                        return Err(syn::Error::new_spanned(
                            lit,
                            "expected a string literal for env name",
                        ));
                    };
                    if attrs.name.is_some() {
                        return Err(meta.error("duplicate env name"));
                    }
                    attrs.name = Some(s.value());
                    return Ok(());
                }

                // skip
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        if attrs.skip && attrs.name.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "env skip cannot be combined with env name",
            ));
        }

        Ok(attrs)
    }

    /// Whether the binder should see this field at all.
    ///
    /// Private fields are never bound.
    pub fn is_bound(&self, field: &Field) -> bool {
        !self.skip && !matches!(field.vis, Visibility::Inherited)
    }
}

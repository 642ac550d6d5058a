//! Attribute parsing for the Record derive macro.

use syn::Result;

/// Tag holding field directives at runtime.
const DIRECTIVE_TAG: &str = "patch";

/// Bare flags that compile into the directive tag.
const DIRECTIVE_FLAGS: &[&str] = &[
    "skip",
    "omitempty",
    "allow_zero",
    "allow_nil",
    "pk",
    "primary_key",
];

#[derive(Default)]
pub(super) struct StructAttrs {
    pub(super) table: Option<String>,
}

impl syn::parse::Parse for StructAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = StructAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            let key = ident.to_string();

            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;

            match key.as_str() {
                "table" => {
                    if value.value().trim().is_empty() {
                        return Err(syn::Error::new_spanned(&value, "table name must not be empty"));
                    }
                    attrs.table = Some(value.value());
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        &ident,
                        format!("unknown struct attribute `{key}`"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

pub(super) fn get_struct_attrs(input: &syn::DeriveInput) -> Result<StructAttrs> {
    let mut merged = StructAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("sqlpatch") {
            continue;
        }
        let parsed: StructAttrs = attr.parse_args()?;
        if parsed.table.is_some() {
            merged.table = parsed.table;
        }
    }
    Ok(merged)
}

#[derive(Default)]
pub(super) struct FieldAttrs {
    /// Raw `key = "value"` tags in declaration order.
    pub(super) tags: Vec<(String, String)>,
    /// Bare directive flags.
    pub(super) directives: Vec<String>,
    pub(super) embedded: bool,
}

impl syn::parse::Parse for FieldAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = FieldAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            let key = ident.to_string();

            if input.peek(syn::Token![=]) {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attrs.set_tag(key, value.value());
            } else {
                match key.as_str() {
                    "embed" | "flatten" => attrs.embedded = true,
                    flag if DIRECTIVE_FLAGS.contains(&flag) => attrs.directives.push(flag.to_string()),
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &ident,
                            format!("unknown field attribute `{key}`"),
                        ));
                    }
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

impl FieldAttrs {
    fn set_tag(&mut self, key: String, value: String) {
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.tags.push((key, value)),
        }
    }

    fn merge(&mut self, other: FieldAttrs) {
        for (key, value) in other.tags {
            self.set_tag(key, value);
        }
        self.directives.extend(other.directives);
        self.embedded |= other.embedded;
    }

    /// Whether the field is skipped whatever storage tag is in use: a bare
    /// `skip` flag, or a `skip`/`-` token in the directive tag.
    pub(super) fn is_skipped(&self) -> bool {
        self.resolved_tags()
            .iter()
            .filter(|(key, _)| key == DIRECTIVE_TAG)
            .flat_map(|(_, raw)| raw.split(','))
            .any(|token| matches!(token.trim().to_ascii_lowercase().as_str(), "skip" | "-"))
    }

    /// Tags as emitted into the descriptor: bare directives are appended to
    /// the directive tag.
    pub(super) fn resolved_tags(&self) -> Vec<(String, String)> {
        let mut tags = self.tags.clone();
        if self.directives.is_empty() {
            return tags;
        }
        let flags = self.directives.join(",");
        match tags.iter_mut().find(|(k, _)| k == DIRECTIVE_TAG) {
            Some((_, raw)) if raw.trim().is_empty() => *raw = flags,
            Some((_, raw)) => {
                raw.push(',');
                raw.push_str(&flags);
            }
            None => tags.push((DIRECTIVE_TAG.to_string(), flags)),
        }
        tags
    }
}

pub(super) fn get_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut merged = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("sqlpatch") {
            continue;
        }
        let parsed: FieldAttrs = attr.parse_args()?;
        merged.merge(parsed);
    }
    Ok(merged)
}

//! Proc-macros for the anchorlinks configuration system.
//!
//! `#[derive(Configurable)]` generates two methods on a config struct:
//!
//! - `apply_override(&mut self, key, value)`, which sets the field behind a
//!   `--config KEY=VALUE` flag, parsing the value for the field's type;
//! - `merge_fields(&mut self, other)`, which layers a later config file over
//!   an earlier one.
//!
//! Only fields carrying a `#[config(...)]` attribute can be overridden.

use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, parse_macro_input};

/// Attribute configuration for a field.
#[derive(Default)]
struct FieldConfig {
  /// The config key name (defaults to field name).
  key: Option<String>,

  /// Whether an empty value resets an `Option` field to `None`.
  allow_empty: bool,
}

impl FieldConfig {
  fn from_attrs(attrs: &[Attribute]) -> Option<Self> {
    let mut found = false;
    let mut config = Self::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("config")) {
      found = true;
      let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
          let lit: syn::LitStr = meta.value()?.parse()?;
          config.key = Some(lit.value());
        } else if meta.path.is_ident("allow_empty") {
          config.allow_empty = true;
        }
        Ok(())
      });
    }

    found.then_some(config)
  }
}

/// Shape of a field type, as far as overriding and merging care.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldKind {
  Option,
  Vec,
  PathBuf,
  String,
  Bool,
  Other,
}

impl FieldKind {
  fn of(field: &Field) -> Self {
    let type_str: String = field
      .ty
      .to_token_stream()
      .to_string()
      .chars()
      .filter(|c| !c.is_whitespace())
      .collect();

    if type_str.starts_with("Option<") {
      Self::Option
    } else if type_str.starts_with("Vec<") {
      Self::Vec
    } else if type_str.ends_with("PathBuf") {
      Self::PathBuf
    } else if type_str == "String" {
      Self::String
    } else if type_str == "bool" {
      Self::Bool
    } else {
      Self::Other
    }
  }
}

/// Derive macro for configuration structs.
#[proc_macro_derive(Configurable, attributes(config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
  let input = parse_macro_input!(input as DeriveInput);
  let name = &input.ident;
  let (impl_generics, ty_generics, where_clause) =
    input.generics.split_for_impl();

  let fields = match &input.data {
    Data::Struct(data) if matches!(data.fields, Fields::Named(_)) => {
      &data.fields
    },
    _ => {
      return syn::Error::new_spanned(
        input,
        "Configurable can only be derived for structs with named fields",
      )
      .to_compile_error()
      .into();
    },
  };

  let field_handlers = fields.iter().filter_map(generate_field_handler);
  let merge_handlers = fields.iter().filter_map(generate_merge_handler);

  let expanded = quote! {
    impl #impl_generics #name #ty_generics #where_clause {
      /// Apply a configuration override by key.
      pub fn apply_override(
        &mut self,
        key: &str,
        value: &str,
      ) -> std::result::Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        #(#field_handlers)*

        Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See `anchorlinks init` for supported keys.",
        )))
      }

      /// Merge another config into this one.
      pub fn merge_fields(&mut self, other: Self) {
        #(#merge_handlers)*
      }
    }
  };

  TokenStream::from(expanded)
}

fn generate_field_handler(field: &Field) -> Option<proc_macro2::TokenStream> {
  let config = FieldConfig::from_attrs(&field.attrs)?;
  let field_name = field.ident.as_ref()?;
  let field_key = config.key.clone().unwrap_or_else(|| field_name.to_string());

  let assignment = match FieldKind::of(field) {
    // Lists come from files only.
    FieldKind::Vec => return None,
    FieldKind::Option => {
      let parsed = quote! {
        Some(value.parse().map_err(|e| ConfigError::Config(format!(
          "Invalid value for '{}': '{}' - {}", #field_key, value, e
        )))?)
      };
      if config.allow_empty {
        quote! {
          self.#field_name = if value.is_empty() { None } else { #parsed };
        }
      } else {
        quote! { self.#field_name = #parsed; }
      }
    },
    FieldKind::PathBuf => {
      quote! {
        self.#field_name = std::path::PathBuf::from(value);
      }
    },
    FieldKind::String => {
      quote! {
        self.#field_name = value.to_string();
      }
    },
    FieldKind::Bool => {
      quote! {
        self.#field_name = match value.to_lowercase().as_str() {
          "true" | "yes" | "1" => true,
          "false" | "no" | "0" => false,
          _ => {
            return Err(ConfigError::Config(format!(
              "Invalid boolean value for '{}': '{}'. Expected true/false, yes/no, or 1/0",
              #field_key, value
            )));
          }
        };
      }
    },
    FieldKind::Other => {
      quote! {
        self.#field_name = value.parse().map_err(|e| ConfigError::Config(format!(
          "Invalid value for '{}': '{}' - {}", #field_key, value, e
        )))?;
      }
    },
  };

  Some(quote! {
    if key == #field_key {
      #assignment
      return Ok(());
    }
  })
}

fn generate_merge_handler(field: &Field) -> Option<proc_macro2::TokenStream> {
  let field_name = field.ident.as_ref()?;

  Some(match FieldKind::of(field) {
    FieldKind::Option => {
      quote! {
        if other.#field_name.is_some() {
          self.#field_name = other.#field_name;
        }
      }
    },
    FieldKind::Vec => {
      quote! {
        self.#field_name.extend(other.#field_name);
      }
    },
    _ => {
      quote! {
        self.#field_name = other.#field_name;
      }
    },
  })
}

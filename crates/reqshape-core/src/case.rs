//! Naming-convention conversion for field names.

use heck::{ToLowerCamelCase, ToSnakeCase};

/// `firstName` -> `first_name`.
pub fn snake_case(name: &str) -> String {
    name.to_snake_case()
}

/// `first_name` -> `firstName`.
pub fn camel_case(name: &str) -> String {
    name.to_lower_camel_case()
}

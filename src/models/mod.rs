//! Data models
//!
//! Row structs that map onto the PostgreSQL schema, plus the domain enums
//! stored as `TEXT` columns.

/// Declares an enum persisted as lowercase text.
///
/// Generates `as_str`, `from_str`, `ALL`, `Display` and serde impls that use
/// the same spelling as the database column.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn from_str(value: &str) -> Option<Self> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod credit;
pub mod inventory_item;
pub mod order;
pub mod settings;
pub mod supply_house;
pub mod truck;
pub mod truck_bin;
pub mod user;

#[cfg(test)]
mod tests {
    use super::user::{UserRole, UserStatus};

    #[test]
    fn text_enums_roundtrip_through_strings() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::from_str(role.as_str()), Some(*role));
        }
        assert_eq!(UserStatus::from_str(" Active "), Some(UserStatus::Active));
        assert_eq!(UserStatus::from_str("deleted"), None);
    }

    #[test]
    fn text_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Technician).unwrap(), "\"technician\"");
        let status: UserStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(status, UserStatus::Suspended);
    }
}

use serde::Deserialize;

use super::{id_string, lenient_string, opt_id_string, opt_lenient_string};

/// Mechanic or staff member, keyed by national id (`ci`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "id_string")]
    pub ci: String,
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "apellidos", default, deserialize_with = "lenient_string")]
    pub surname: String,
    #[serde(rename = "telefono", default, deserialize_with = "opt_id_string")]
    pub phone: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        join_name(&self.name, &self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    #[serde(default, deserialize_with = "id_string")]
    pub ci: String,
    #[serde(rename = "nombre", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "apellidos", default, deserialize_with = "lenient_string")]
    pub surname: String,
    #[serde(rename = "telefono", default, deserialize_with = "opt_id_string")]
    pub phone: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        join_name(&self.name, &self.surname)
    }
}

/// Back-office account that can be attached to a work order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "nombre", default, deserialize_with = "opt_lenient_string")]
    pub name: Option<String>,
}

fn join_name(name: &str, surname: &str) -> String {
    format!("{} {}", name.trim(), surname.trim()).trim().to_string()
}

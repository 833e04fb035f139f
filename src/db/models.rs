use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::sqlite::{NewRecord, Record, SqliteQuery};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub email: String,
    pub phone: String,
    /// Free-text medical history.
    pub history: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Appointment {
    pub id: i64,
    /// Not checked against `patients`; may dangle.
    pub patient_id: i64,
    pub date: String,
    pub time: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub item_name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub phone: String,
    pub history: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub date: String,
    pub time: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub item_name: String,
    pub quantity: i64,
}

impl Record for Patient {
    const ENTITY: &'static str = "patient";
    const TABLE: &'static str = "patients";
    const FIELDS: &'static [&'static str] = &["name", "age", "email", "phone", "history"];
}

impl Record for Appointment {
    const ENTITY: &'static str = "appointment";
    const TABLE: &'static str = "appointments";
    const FIELDS: &'static [&'static str] = &["patient_id", "date", "time", "description"];
}

impl Record for InventoryItem {
    const ENTITY: &'static str = "inventory";
    const TABLE: &'static str = "inventories";
    const FIELDS: &'static [&'static str] = &["item_name", "quantity"];
}

// Bind order must follow the owning record's FIELDS.

impl NewRecord for NewPatient {
    type Stored = Patient;

    fn bind_values<'q>(self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name)
            .bind(self.age)
            .bind(self.email)
            .bind(self.phone)
            .bind(self.history)
    }
}

impl NewRecord for NewAppointment {
    type Stored = Appointment;

    fn bind_values<'q>(self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.patient_id)
            .bind(self.date)
            .bind(self.time)
            .bind(self.description)
    }
}

impl NewRecord for NewInventoryItem {
    type Stored = InventoryItem;

    fn bind_values<'q>(self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.item_name).bind(self.quantity)
    }
}

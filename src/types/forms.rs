//! Request body shapes for the create endpoints.
//!
//! Every field is optional at the serde level so that a missing field is
//! reported by name through [`BindError::MissingField`] rather than as an
//! opaque deserializer message. Type mismatches still fail during parsing.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::db::{NewAppointment, NewInventoryItem, NewPatient, NewRecord};
use crate::error::BindError;

/// A create request body that validates into an insertable record.
pub trait CreateForm: DeserializeOwned + Send + 'static {
    type Record: NewRecord;

    fn validate(self) -> Result<Self::Record, BindError>;
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, BindError> {
    value.ok_or(BindError::MissingField { field })
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientForm {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub history: Option<String>,
}

impl CreateForm for PatientForm {
    type Record = NewPatient;

    fn validate(self) -> Result<NewPatient, BindError> {
        Ok(NewPatient {
            name: require(self.name, "name")?,
            age: require(self.age, "age")?,
            email: require(self.email, "email")?,
            phone: require(self.phone, "phone")?,
            history: require(self.history, "history")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentForm {
    pub patient_id: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
}

impl CreateForm for AppointmentForm {
    type Record = NewAppointment;

    fn validate(self) -> Result<NewAppointment, BindError> {
        Ok(NewAppointment {
            patient_id: require(self.patient_id, "patient_id")?,
            date: require(self.date, "date")?,
            time: require(self.time, "time")?,
            description: require(self.description, "description")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryForm {
    pub item_name: Option<String>,
    pub quantity: Option<i64>,
}

impl CreateForm for InventoryForm {
    type Record = NewInventoryItem;

    fn validate(self) -> Result<NewInventoryItem, BindError> {
        Ok(NewInventoryItem {
            item_name: require(self.item_name, "item_name")?,
            quantity: require(self.quantity, "quantity")?,
        })
    }
}

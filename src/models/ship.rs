use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{VoyageError, VoyageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    BulkCarrier,
    ContainerShip,
    CruiseShip,
    FeederShip,
    Ferry,
    FishingVessel,
    GeneralCargoVessel,
    MultiPurposeVessel,
    OceanLiner,
    ReeferShip,
    Sailboat,
    Tanker,
    Tugboat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipStatus {
    #[default]
    Standby,
    Loading,
    Unloading,
    Sailing,
    Maintenance,
    Emergency,
    Retired,
}

/// Registration of a ship with one authority, e.g. `IMO:REG-9074729`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipRegistrationId {
    organization: String,
    registration_type: String,
    number: String,
}

impl ShipRegistrationId {
    pub fn new(
        organization: impl Into<String>,
        registration_type: impl Into<String>,
        number: impl Into<String>,
    ) -> VoyageResult<Self> {
        let organization = organization.into();
        let registration_type = registration_type.into();
        let number = number.into();

        for (field, value) in [
            ("organization", &organization),
            ("registration type", &registration_type),
            ("registration number", &number),
        ] {
            if value.trim().is_empty() {
                return Err(VoyageError::invalid_argument(format!("{field} cannot be empty")));
            }
        }

        Ok(Self {
            organization,
            registration_type,
            number,
        })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn registration_type(&self) -> &str {
        &self.registration_type
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for ShipRegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.organization, self.registration_type, self.number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub ship_type: ShipType,
    pub captain_id: Option<Uuid>,
    pub passenger_capacity: u32,
    status: ShipStatus,
    registrations: Vec<ShipRegistrationId>,
}

impl Ship {
    pub fn new(company_id: Uuid, name: impl Into<String>, ship_type: ShipType) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: name.into(),
            ship_type,
            captain_id: None,
            passenger_capacity: 0,
            status: ShipStatus::Standby,
            registrations: Vec::new(),
        }
    }

    pub fn status(&self) -> ShipStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ShipStatus) {
        self.status = status;
    }

    pub fn registrations(&self) -> &[ShipRegistrationId] {
        &self.registrations
    }

    pub fn add_registration(&mut self, registration: ShipRegistrationId) -> VoyageResult<()> {
        if self.registrations.contains(&registration) {
            return Err(VoyageError::invalid_state(format!(
                "registration {registration} already exists for ship {}",
                self.name
            )));
        }
        self.registrations.push(registration);
        Ok(())
    }

    /// Returns whether the registration was present.
    pub fn remove_registration(&mut self, registration: &ShipRegistrationId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r != registration);
        before != self.registrations.len()
    }

    pub fn registration_by_org(&self, organization: &str) -> Option<&ShipRegistrationId> {
        self.registrations
            .iter()
            .find(|r| r.organization == organization)
    }
}

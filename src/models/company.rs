use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::join_code;
use crate::models::ship::Ship;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    total_fleet: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: impl Into<String>, address: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            email: email.into(),
            total_fleet: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn total_fleet(&self) -> u32 {
        self.total_fleet
    }

    /// Counts a ship into the fleet. Ships owned by another company are ignored.
    pub fn add_ship(&mut self, ship: &Ship) -> bool {
        if ship.company_id != self.id {
            return false;
        }
        self.total_fleet += 1;
        self.updated_at = Utc::now();
        true
    }

    pub fn remove_ship(&mut self) {
        self.total_fleet = self.total_fleet.saturating_sub(1);
        self.updated_at = Utc::now();
    }

    pub fn join_code(&self) -> String {
        join_code::from_company_id(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::ship::ShipType;

    #[test]
    fn fleet_follows_added_and_removed_ships() {
        let mut company = Company::new("Pelni", "Jakarta", "ops@pelni.example");
        let ship = Ship::new(company.id, "KM Kelud", ShipType::Ferry);
        let stranger = Ship::new(Uuid::new_v4(), "MV Other", ShipType::Tanker);

        assert!(company.add_ship(&ship));
        assert!(!company.add_ship(&stranger));
        assert_eq!(company.total_fleet(), 1);

        company.remove_ship();
        company.remove_ship();
        assert_eq!(company.total_fleet(), 0);
    }

    #[test]
    fn join_code_is_derived_from_id() {
        let company = Company::new("Pelni", "Jakarta", "ops@pelni.example");
        assert_eq!(company.join_code(), join_code::from_company_id(company.id));
    }
}

//! Address management.

use sqlx::PgPool;

use wardrobe_core::{AddressId, UserId};

use crate::db::AddressRepository;
use crate::error::{CheckoutError, Result};
use crate::models::{Address, NewAddress};

/// Address service.
pub struct AddressService<'a> {
    addresses: AddressRepository<'a>,
}

impl<'a> AddressService<'a> {
    /// Create a new address service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            addresses: AddressRepository::new(pool),
        }
    }

    /// Create an address for the shopper.
    ///
    /// Marking it default clears any previous default, so a shopper never
    /// ends up with two.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` if the full name, first
    /// address line, city, or country is empty.
    pub async fn create(&self, user_id: UserId, req: &NewAddress) -> Result<Address> {
        validate_required(req)?;
        Ok(self.addresses.create(user_id, req).await?)
    }

    /// List the shopper's addresses, default first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` on storage failure.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Address>> {
        Ok(self.addresses.list(user_id).await?)
    }

    /// Get one address, scoped to the owning shopper.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotFound` if the address is absent or owned
    /// by a different shopper.
    pub async fn get(&self, id: AddressId, user_id: UserId) -> Result<Address> {
        self.addresses
            .by_id(id, user_id)
            .await?
            .ok_or(CheckoutError::NotFound("address"))
    }
}

fn validate_required(req: &NewAddress) -> Result<()> {
    let required: [(&'static str, &str); 4] = [
        ("full_name", &req.full_name),
        ("address_line1", &req.address_line1),
        ("city", &req.city),
        ("country", &req.country),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(CheckoutError::MissingField(name));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> NewAddress {
        NewAddress {
            title: "Home".to_owned(),
            full_name: "Ada Lovelace".to_owned(),
            phone: "+44 20 0000 0000".to_owned(),
            address_line1: "12 St James's Square".to_owned(),
            city: "London".to_owned(),
            country: "United Kingdom".to_owned(),
            ..NewAddress::default()
        }
    }

    #[test]
    fn complete_addresses_validate() {
        assert!(validate_required(&filled()).is_ok());
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let req = NewAddress {
            title: String::new(),
            phone: String::new(),
            address_line2: String::new(),
            state: String::new(),
            postal_code: String::new(),
            ..filled()
        };
        assert!(validate_required(&req).is_ok());
    }

    #[test]
    fn each_required_field_is_enforced() {
        for field in ["full_name", "address_line1", "city", "country"] {
            let mut req = filled();
            match field {
                "full_name" => req.full_name = "  ".to_owned(),
                "address_line1" => req.address_line1 = String::new(),
                "city" => req.city = String::new(),
                _ => req.country = String::new(),
            }
            let err = validate_required(&req).unwrap_err();
            assert!(
                matches!(err, CheckoutError::MissingField(name) if name == field),
                "expected MissingField({field}), got {err:?}"
            );
        }
    }
}

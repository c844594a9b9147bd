use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{DepoError, DepoResult};

/// Sale granularity of a product: a single unit or a fixed-size package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Piece,
    Box,
}

impl Default for UnitType {
    fn default() -> Self {
        UnitType::Piece
    }
}

impl UnitType {
    /// Resolves the package quantity for this unit type.
    ///
    /// Piece products never carry a package quantity; whatever was supplied
    /// is dropped. Box products must carry a positive one.
    pub fn resolve_package_quantity(self, supplied: Option<i32>) -> DepoResult<Option<i32>> {
        match self {
            UnitType::Piece => Ok(None),
            UnitType::Box => match supplied {
                Some(n) if n >= 1 => Ok(Some(n)),
                Some(_) => Err(DepoError::Validation(
                    "package_quantity must be at least 1 for box products".to_string(),
                )),
                None => Err(DepoError::Validation(
                    "package_quantity is required for box products".to_string(),
                )),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub barcode: String,
    pub quantity: i32,
    pub min_quantity: i32,
    pub brand: String,
    pub category: String,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub description: Option<String>,
    pub unit_type: UnitType,
    // Always serialized, explicitly null for piece products.
    pub package_quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub barcode: String,
    pub quantity: i32,
    pub min_quantity: i32,
    pub brand: String,
    pub category: String,
    pub purchase_price: f64,
    pub sale_price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit_type: UnitType,
    #[serde(default)]
    pub package_quantity: Option<i32>,
}

/// Partial update document. Omitted fields keep their prior value;
/// `description` and `package_quantity` distinguish "omitted" from
/// "set to null" via the double Option.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub barcode: Option<String>,
    pub quantity: Option<i32>,
    pub min_quantity: Option<i32>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub unit_type: Option<UnitType>,
    #[serde(default, deserialize_with = "double_option")]
    pub package_quantity: Option<Option<i32>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// In-process record store with the uniqueness guarantees the API relies on:
/// `username` is unique across users and `barcode` across products. Writes
/// are serialized behind the lock, so two racing creations with the same
/// barcode resolve deterministically.
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            users: RwLock::new(Vec::new()),
            products: RwLock::new(Vec::new()),
        }
    }

    /// Creates the administrator account if it does not exist yet.
    /// Idempotent; an existing account is left untouched.
    pub fn ensure_seeds(&self) -> DepoResult<()> {
        let admin_username = std::env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let mut users = self
            .users
            .write()
            .map_err(|_| DepoError::Internal("user store lock poisoned".to_string()))?;

        if users.iter().any(|u| u.username == admin_username) {
            return Ok(());
        }

        let hash = bcrypt::hash(&admin_password, bcrypt::DEFAULT_COST)?;
        users.push(User {
            id: "admin-user-id".to_string(),
            username: admin_username.clone(),
            password: hash,
            email: None,
            role: "administrator".to_string(),
            created_at: Utc::now(),
        });

        tracing::info!("Seeded administrator account '{}'", admin_username);
        Ok(())
    }

    pub fn find_user_by_username(&self, username: &str) -> DepoResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| DepoError::Internal("user store lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    pub fn find_user_by_id(&self, id: &str) -> DepoResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| DepoError::Internal("user store lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    /// Inserts a product after the barcode-uniqueness check and the unit
    /// invariant have both passed. Nothing is written on failure.
    pub fn create_product(&self, new: NewProduct) -> DepoResult<Product> {
        let mut products = self
            .products
            .write()
            .map_err(|_| DepoError::Internal("product store lock poisoned".to_string()))?;

        if products.iter().any(|p| p.barcode == new.barcode) {
            return Err(DepoError::Duplicate(format!(
                "a product with barcode '{}' already exists",
                new.barcode
            )));
        }

        let package_quantity = new.unit_type.resolve_package_quantity(new.package_quantity)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            barcode: new.barcode,
            quantity: new.quantity,
            min_quantity: new.min_quantity,
            brand: new.brand,
            category: new.category,
            purchase_price: new.purchase_price,
            sale_price: new.sale_price,
            description: new.description,
            unit_type: new.unit_type,
            package_quantity,
            created_at: Utc::now(),
        };
        products.push(product.clone());

        Ok(product)
    }

    pub fn list_products(&self) -> DepoResult<Vec<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| DepoError::Internal("product store lock poisoned".to_string()))?;
        Ok(products.clone())
    }

    pub fn get_product(&self, id: &str) -> DepoResult<Option<Product>> {
        let products = self
            .products
            .read()
            .map_err(|_| DepoError::Internal("product store lock poisoned".to_string()))?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    /// Applies a partial update. The unit invariant is validated against the
    /// merged record; the stored record is only replaced once every check
    /// has passed.
    pub fn update_product(&self, id: &str, patch: ProductPatch) -> DepoResult<Product> {
        let mut products = self
            .products
            .write()
            .map_err(|_| DepoError::Internal("product store lock poisoned".to_string()))?;

        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DepoError::NotFound(format!("product '{}' not found", id)))?;

        if let Some(ref barcode) = patch.barcode {
            let taken = products
                .iter()
                .any(|p| p.barcode == *barcode && p.id != id);
            if taken {
                return Err(DepoError::Duplicate(format!(
                    "a product with barcode '{}' already exists",
                    barcode
                )));
            }
        }

        let mut merged = products[index].clone();
        if let Some(name) = patch.name {
            merged.name = name;
        }
        if let Some(barcode) = patch.barcode {
            merged.barcode = barcode;
        }
        if let Some(quantity) = patch.quantity {
            merged.quantity = quantity;
        }
        if let Some(min_quantity) = patch.min_quantity {
            merged.min_quantity = min_quantity;
        }
        if let Some(brand) = patch.brand {
            merged.brand = brand;
        }
        if let Some(category) = patch.category {
            merged.category = category;
        }
        if let Some(purchase_price) = patch.purchase_price {
            merged.purchase_price = purchase_price;
        }
        if let Some(sale_price) = patch.sale_price {
            merged.sale_price = sale_price;
        }
        if let Some(description) = patch.description {
            merged.description = description;
        }
        if let Some(unit_type) = patch.unit_type {
            merged.unit_type = unit_type;
        }

        // An explicitly supplied value (including an explicit null) wins;
        // an omitted field keeps the prior package quantity for the merge.
        let supplied = match patch.package_quantity {
            Some(value) => value,
            None => merged.package_quantity,
        };
        merged.package_quantity = merged.unit_type.resolve_package_quantity(supplied)?;

        products[index] = merged.clone();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_drops_any_supplied_package_quantity() {
        assert_eq!(
            UnitType::Piece.resolve_package_quantity(Some(5)).unwrap(),
            None
        );
        assert_eq!(UnitType::Piece.resolve_package_quantity(None).unwrap(), None);
    }

    #[test]
    fn box_requires_positive_package_quantity() {
        assert_eq!(
            UnitType::Box.resolve_package_quantity(Some(12)).unwrap(),
            Some(12)
        );
        assert!(UnitType::Box.resolve_package_quantity(None).is_err());
        assert!(UnitType::Box.resolve_package_quantity(Some(0)).is_err());
        assert!(UnitType::Box.resolve_package_quantity(Some(-3)).is_err());
    }

    #[test]
    fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_seeds().unwrap();
        store.ensure_seeds().unwrap();

        let users = store.users.read().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, "administrator");
        assert_eq!(users[0].id, "admin-user-id");
    }
}

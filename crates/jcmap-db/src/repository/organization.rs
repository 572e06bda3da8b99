//! SurrealDB implementation of [`OrganizationRepository`].
//!
//! The derived location is written as a point literal with longitude
//! first, mirroring the `POINT(lng lat)` convention, and only when both
//! coordinates arrive on the same write. Nearby queries use
//! `geo::distance`, which returns great-circle metres.

use chrono::{DateTime, Utc};
use jcmap_core::error::JcmapResult;
use jcmap_core::models::GeoPoint;
use jcmap_core::models::organization::{
    CreateOrganization, Organization, OrganizationFilter, UpdateOrganization,
};
use jcmap_core::repository::OrganizationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct that includes the record ID via `meta::id(id)`.
/// The geometry column is never read back; the scalar derived
/// coordinates are.
#[derive(Debug, SurrealValue)]
pub(crate) struct OrganizationRowWithId {
    record_id: String,
    name: String,
    description: Option<String>,
    website: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location_lng: Option<f64>,
    location_lat: Option<f64>,
    logo_url: Option<String>,
    is_verified: bool,
    owner_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Same row shape plus the projected distance used for ordering.
#[derive(Debug, SurrealValue)]
struct OrganizationNearbyRow {
    record_id: String,
    name: String,
    description: Option<String>,
    website: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location_lng: Option<f64>,
    location_lat: Option<f64>,
    logo_url: Option<String>,
    is_verified: bool,
    owner_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    #[allow(dead_code)]
    distance: f64,
}

fn build_point(lng: Option<f64>, lat: Option<f64>) -> Option<GeoPoint> {
    match (lng, lat) {
        (Some(longitude), Some(latitude)) => Some(GeoPoint {
            longitude,
            latitude,
        }),
        _ => None,
    }
}

impl OrganizationRowWithId {
    pub(crate) fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let owner_id = Uuid::parse_str(&self.owner_id)
            .map_err(|e| DbError::Decode(format!("invalid owner UUID: {e}")))?;
        Ok(Organization {
            id,
            name: self.name,
            description: self.description,
            website: self.website,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            location: build_point(self.location_lng, self.location_lat),
            logo_url: self.logo_url,
            is_verified: self.is_verified,
            owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

impl OrganizationNearbyRow {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        OrganizationRowWithId {
            record_id: self.record_id,
            name: self.name,
            description: self.description,
            website: self.website,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            location_lng: self.location_lng,
            location_lat: self.location_lat,
            logo_url: self.logo_url,
            is_verified: self.is_verified,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
        .try_into_organization()
    }
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id_str: &str) -> Result<Organization, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * OMIT location \
                 FROM type::record('organization', $id) \
                 WHERE deleted_at = NONE",
            )
            .bind(("id", id_str.to_string()))
            .await?;

        let rows: Vec<OrganizationRowWithId> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str.to_string(),
        })?;

        row.try_into_organization()
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> JcmapResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Point literal is longitude-first. Derived only when both
        // coordinates were supplied together.
        let location_set = match (input.longitude, input.latitude) {
            (Some(lng), Some(lat)) => format!(
                ", location = ({lng:?}, {lat:?}), \
                 location_lng = {lng:?}, location_lat = {lat:?}"
            ),
            _ => String::new(),
        };

        let query = format!(
            "CREATE type::record('organization', $id) SET \
             name = $name, description = $description, \
             website = $website, address = $address, \
             latitude = $latitude, longitude = $longitude, \
             logo_url = $logo_url, is_verified = false, \
             owner_id = $owner_id{location_set} \
             RETURN NONE"
        );

        self.db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("website", input.website))
            .bind(("address", input.address))
            .bind(("latitude", input.latitude))
            .bind(("longitude", input.longitude))
            .bind(("logo_url", input.logo_url))
            .bind(("owner_id", input.owner_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> JcmapResult<Organization> {
        Ok(self.fetch(&id.to_string()).await?)
    }

    async fn list(&self, filter: OrganizationFilter) -> JcmapResult<Vec<Organization>> {
        let mut conds = vec!["deleted_at = NONE"];
        if filter.search.is_some() {
            conds.push(
                "(string::contains(string::lowercase(name), $search) OR \
                 (description != NONE AND \
                 string::contains(string::lowercase(description), $search)))",
            );
        }
        if filter.is_verified.is_some() {
            conds.push("is_verified = $is_verified");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * OMIT location \
             FROM organization WHERE {} \
             ORDER BY created_at ASC",
            conds.join(" AND ")
        );

        let mut builder = self.db.query(&query);
        if let Some(search) = filter.search {
            builder = builder.bind(("search", search.to_lowercase()));
        }
        if let Some(is_verified) = filter.is_verified {
            builder = builder.bind(("is_verified", is_verified));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> JcmapResult<Vec<Organization>> {
        let radius_m = radius_km * 1000.0;

        let query = format!(
            "SELECT meta::id(id) AS record_id, \
             geo::distance(location, ({longitude:?}, {latitude:?})) AS distance, \
             * OMIT location \
             FROM organization \
             WHERE deleted_at = NONE AND location != NONE \
             AND geo::distance(location, ({longitude:?}, {latitude:?})) <= {radius_m:?} \
             ORDER BY distance ASC"
        );

        let mut result = self.db.query(query).await.map_err(DbError::from)?;
        let rows: Vec<OrganizationNearbyRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdateOrganization) -> JcmapResult<Organization> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name".to_string());
        }
        if input.description.is_some() {
            sets.push("description = $description".to_string());
        }
        if input.website.is_some() {
            sets.push("website = $website".to_string());
        }
        if input.address.is_some() {
            sets.push("address = $address".to_string());
        }
        if input.latitude.is_some() {
            sets.push("latitude = $latitude".to_string());
        }
        if input.longitude.is_some() {
            sets.push("longitude = $longitude".to_string());
        }
        if input.logo_url.is_some() {
            sets.push("logo_url = $logo_url".to_string());
        }
        if input.is_verified.is_some() {
            sets.push("is_verified = $is_verified".to_string());
        }
        // The derived point only moves when both coordinates arrive on
        // the same write.
        if let (Some(lng), Some(lat)) = (input.longitude, input.latitude) {
            sets.push(format!(
                "location = ({lng:?}, {lat:?}), \
                 location_lng = {lng:?}, location_lat = {lat:?}"
            ));
        }
        sets.push("updated_at = time::now()".to_string());

        let query = format!(
            "UPDATE type::record('organization', $id) SET {} RETURN NONE",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(website) = input.website {
            builder = builder.bind(("website", website));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(latitude) = input.latitude {
            builder = builder.bind(("latitude", latitude));
        }
        if let Some(longitude) = input.longitude {
            builder = builder.bind(("longitude", longitude));
        }
        if let Some(logo_url) = input.logo_url {
            // Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("logo_url", logo_url));
        }
        if let Some(is_verified) = input.is_verified {
            builder = builder.bind(("is_verified", is_verified));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn soft_delete(&self, id: Uuid) -> JcmapResult<()> {
        self.db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 deleted_at = time::now(), updated_at = time::now() \
                 RETURN NONE",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}

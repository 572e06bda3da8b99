//! SurrealDB implementation of [`EventRepository`].
//!
//! Participation and favorites are RELATION edge tables
//! (`participates`, `favorites`) from `user` to `event`. Writes are
//! made idempotent with a delete-then-relate pair, so repeating a join
//! never duplicates the edge. Events are hard-deleted, and both edge
//! sets go first.

use chrono::{DateTime, Utc};
use jcmap_core::error::JcmapResult;
use jcmap_core::models::GeoPoint;
use jcmap_core::models::event::{CreateEvent, Event, EventDetail, EventFilter, UpdateEvent};
use jcmap_core::models::organization::Organization;
use jcmap_core::models::user::User;
use jcmap_core::repository::EventRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::organization::OrganizationRowWithId;
use crate::repository::user::UserRowWithId;

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct EventRowWithId {
    record_id: String,
    title: String,
    description: Option<String>,
    kind: String,
    category: String,
    latitude: f64,
    longitude: f64,
    location_lng: Option<f64>,
    location_lat: Option<f64>,
    address: String,
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    image_url: Option<String>,
    organizer_id: String,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Same row shape plus the projected distance used for ordering.
#[derive(Debug, SurrealValue)]
struct EventNearbyRow {
    record_id: String,
    title: String,
    description: Option<String>,
    kind: String,
    category: String,
    latitude: f64,
    longitude: f64,
    location_lng: Option<f64>,
    location_lat: Option<f64>,
    address: String,
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
    image_url: Option<String>,
    organizer_id: String,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[allow(dead_code)]
    distance: f64,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

impl EventRowWithId {
    fn try_into_event(self) -> Result<Event, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let organizer_id = Uuid::parse_str(&self.organizer_id)
            .map_err(|e| DbError::Decode(format!("invalid organizer UUID: {e}")))?;
        let organization_id = self
            .organization_id
            .map(|v| {
                Uuid::parse_str(&v)
                    .map_err(|e| DbError::Decode(format!("invalid organization UUID: {e}")))
            })
            .transpose()?;
        let location = match (self.location_lng, self.location_lat) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint {
                longitude,
                latitude,
            }),
            _ => None,
        };
        Ok(Event {
            id,
            title: self.title,
            description: self.description,
            kind: self.kind,
            category: self.category,
            latitude: self.latitude,
            longitude: self.longitude,
            location,
            address: self.address,
            start_datetime: self.start_datetime,
            end_datetime: self.end_datetime,
            image_url: self.image_url,
            organizer_id,
            organization_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl EventNearbyRow {
    fn try_into_event(self) -> Result<Event, DbError> {
        EventRowWithId {
            record_id: self.record_id,
            title: self.title,
            description: self.description,
            kind: self.kind,
            category: self.category,
            latitude: self.latitude,
            longitude: self.longitude,
            location_lng: self.location_lng,
            location_lat: self.location_lat,
            address: self.address,
            start_datetime: self.start_datetime,
            end_datetime: self.end_datetime,
            image_url: self.image_url,
            organizer_id: self.organizer_id,
            organization_id: self.organization_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .try_into_event()
    }
}

/// SurrealDB implementation of the Event repository.
#[derive(Clone)]
pub struct SurrealEventRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEventRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id_str: &str) -> Result<Event, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * OMIT location \
                 FROM type::record('event', $id)",
            )
            .bind(("id", id_str.to_string()))
            .await?;

        let rows: Vec<EventRowWithId> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "event".into(),
            id: id_str.to_string(),
        })?;

        row.try_into_event()
    }

    async fn fetch_user(&self, id_str: &str) -> Result<User, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('user', $id)",
            )
            .bind(("id", id_str.to_string()))
            .await?;

        let rows: Vec<UserRowWithId> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str.to_string(),
        })?;

        row.try_into_user()
    }

    async fn fetch_organization(&self, id_str: &str) -> Result<Option<Organization>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * OMIT location \
                 FROM type::record('organization', $id)",
            )
            .bind(("id", id_str.to_string()))
            .await?;

        let rows: Vec<OrganizationRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(|row| row.try_into_organization())
            .transpose()
    }

    async fn exists(&self, table: &str, id_str: &str) -> Result<bool, DbError> {
        let query =
            format!("SELECT count() AS total FROM type::record('{table}', $id) GROUP ALL");
        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.to_string()))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn ensure_edge_endpoints(&self, event_id: Uuid, user_id: Uuid) -> Result<(), DbError> {
        if !self.exists("event", &event_id.to_string()).await? {
            return Err(DbError::NotFound {
                entity: "event".into(),
                id: event_id.to_string(),
            });
        }
        if !self.exists("user", &user_id.to_string()).await? {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete-then-relate keeps the edge unique without a uniqueness
    /// index on the relation table.
    async fn relate_unique(
        &self,
        edge: &str,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DbError> {
        let delete = format!(
            "DELETE {edge} WHERE in = type::record('user', $user_id) \
             AND out = type::record('event', $event_id)"
        );
        let relate = format!(
            "RELATE user:`{user_id}` -> {edge} -> event:`{event_id}`"
        );

        self.db
            .query(delete)
            .query(relate)
            .bind(("user_id", user_id.to_string()))
            .bind(("event_id", event_id.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    async fn unrelate(&self, edge: &str, event_id: Uuid, user_id: Uuid) -> Result<(), DbError> {
        let delete = format!(
            "DELETE {edge} WHERE in = type::record('user', $user_id) \
             AND out = type::record('event', $event_id)"
        );

        self.db
            .query(delete)
            .bind(("user_id", user_id.to_string()))
            .bind(("event_id", event_id.to_string()))
            .await?
            .check()?;

        Ok(())
    }
}

impl<C: Connection> EventRepository for SurrealEventRepository<C> {
    async fn create(&self, input: CreateEvent) -> JcmapResult<Event> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let lng = input.longitude;
        let lat = input.latitude;

        // Coordinates are mandatory, so the point is always derived.
        // Point literal is longitude-first.
        let mut query = format!(
            "CREATE type::record('event', $id) SET \
             title = $title, description = $description, \
             kind = $kind, latitude = $latitude, longitude = $longitude, \
             location = ({lng:?}, {lat:?}), \
             location_lng = {lng:?}, location_lat = {lat:?}, \
             address = $address, \
             start_datetime = $start_datetime, end_datetime = $end_datetime, \
             image_url = $image_url, \
             organizer_id = $organizer_id, organization_id = $organization_id"
        );
        if input.category.is_some() {
            query.push_str(", category = $category");
        }
        query.push_str(" RETURN NONE");

        let mut builder = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("kind", input.kind))
            .bind(("latitude", input.latitude))
            .bind(("longitude", input.longitude))
            .bind(("address", input.address))
            .bind(("start_datetime", input.start_datetime))
            .bind(("end_datetime", input.end_datetime))
            .bind(("image_url", input.image_url))
            .bind(("organizer_id", input.organizer_id.to_string()))
            .bind(("organization_id", input.organization_id.map(|v| v.to_string())));
        if let Some(category) = input.category {
            builder = builder.bind(("category", category));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> JcmapResult<Event> {
        Ok(self.fetch(&id.to_string()).await?)
    }

    async fn get_detail(&self, id: Uuid) -> JcmapResult<EventDetail> {
        let event = self.fetch(&id.to_string()).await?;

        let organizer = self.fetch_user(&event.organizer_id.to_string()).await?;

        let organization = match event.organization_id {
            Some(org_id) => self.fetch_organization(&org_id.to_string()).await?,
            None => None,
        };

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE id IN (SELECT VALUE in FROM participates \
                 WHERE out = type::record('event', $event_id))",
            )
            .bind(("event_id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let participants = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(EventDetail {
            event,
            organizer,
            organization,
            participants,
        })
    }

    async fn list(&self, filter: EventFilter) -> JcmapResult<Vec<Event>> {
        let mut conds = Vec::new();
        if filter.search.is_some() {
            conds.push(
                "(string::contains(string::lowercase(title), $search) OR \
                 (description != NONE AND \
                 string::contains(string::lowercase(description), $search)) OR \
                 string::contains(string::lowercase(address), $search))",
            );
        }
        if filter.category.is_some() {
            conds.push("category = $category");
        }
        if filter.organization_id.is_some() {
            conds.push("organization_id = $organization_id");
        }

        let where_clause = if conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conds.join(" AND "))
        };

        let query = format!(
            "SELECT meta::id(id) AS record_id, * OMIT location \
             FROM event{where_clause} \
             ORDER BY start_datetime ASC"
        );

        let mut builder = self.db.query(&query);
        if let Some(search) = filter.search {
            builder = builder.bind(("search", search.to_lowercase()));
        }
        if let Some(category) = filter.category {
            builder = builder.bind(("category", category));
        }
        if let Some(organization_id) = filter.organization_id {
            builder = builder.bind(("organization_id", organization_id.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<EventRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_event())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> JcmapResult<Vec<Event>> {
        let radius_m = radius_km * 1000.0;

        let query = format!(
            "SELECT meta::id(id) AS record_id, \
             geo::distance(location, ({longitude:?}, {latitude:?})) AS distance, \
             * OMIT location \
             FROM event \
             WHERE location != NONE \
             AND geo::distance(location, ({longitude:?}, {latitude:?})) <= {radius_m:?} \
             ORDER BY distance ASC"
        );

        let mut result = self.db.query(query).await.map_err(DbError::from)?;
        let rows: Vec<EventNearbyRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_event())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdateEvent) -> JcmapResult<Event> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title".to_string());
        }
        if input.description.is_some() {
            sets.push("description = $description".to_string());
        }
        if input.kind.is_some() {
            sets.push("kind = $kind".to_string());
        }
        if input.category.is_some() {
            sets.push("category = $category".to_string());
        }
        if input.latitude.is_some() {
            sets.push("latitude = $latitude".to_string());
        }
        if input.longitude.is_some() {
            sets.push("longitude = $longitude".to_string());
        }
        if input.address.is_some() {
            sets.push("address = $address".to_string());
        }
        if input.start_datetime.is_some() {
            sets.push("start_datetime = $start_datetime".to_string());
        }
        if input.end_datetime.is_some() {
            sets.push("end_datetime = $end_datetime".to_string());
        }
        if input.image_url.is_some() {
            sets.push("image_url = $image_url".to_string());
        }
        if input.organization_id.is_some() {
            sets.push("organization_id = $organization_id".to_string());
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
            "UPDATE type::record('event', $id) SET {} RETURN NONE",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(kind) = input.kind {
            builder = builder.bind(("kind", kind));
        }
        if let Some(category) = input.category {
            builder = builder.bind(("category", category));
        }
        if let Some(latitude) = input.latitude {
            builder = builder.bind(("latitude", latitude));
        }
        if let Some(longitude) = input.longitude {
            builder = builder.bind(("longitude", longitude));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(start_datetime) = input.start_datetime {
            builder = builder.bind(("start_datetime", start_datetime));
        }
        if let Some(end_datetime) = input.end_datetime {
            builder = builder.bind(("end_datetime", end_datetime));
        }
        if let Some(image_url) = input.image_url {
            // Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("image_url", image_url));
        }
        if let Some(organization_id) = input.organization_id {
            builder = builder.bind(("organization_id", organization_id.map(|v| v.to_string())));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn delete(&self, id: Uuid) -> JcmapResult<()> {
        // Edges go first, then the record itself.
        self.db
            .query("DELETE participates WHERE out = type::record('event', $id)")
            .query("DELETE favorites WHERE out = type::record('event', $id)")
            .query("DELETE type::record('event', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn add_participant(&self, event_id: Uuid, user_id: Uuid) -> JcmapResult<()> {
        self.ensure_edge_endpoints(event_id, user_id).await?;
        self.relate_unique("participates", event_id, user_id).await?;
        Ok(())
    }

    async fn remove_participant(&self, event_id: Uuid, user_id: Uuid) -> JcmapResult<()> {
        self.ensure_edge_endpoints(event_id, user_id).await?;
        self.unrelate("participates", event_id, user_id).await?;
        Ok(())
    }

    async fn is_favorited(&self, event_id: Uuid, user_id: Uuid) -> JcmapResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM favorites \
                 WHERE in = type::record('user', $user_id) \
                 AND out = type::record('event', $event_id) \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("event_id", event_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn add_favorite(&self, event_id: Uuid, user_id: Uuid) -> JcmapResult<()> {
        self.ensure_edge_endpoints(event_id, user_id).await?;
        self.relate_unique("favorites", event_id, user_id).await?;
        Ok(())
    }

    async fn remove_favorite(&self, event_id: Uuid, user_id: Uuid) -> JcmapResult<()> {
        self.ensure_edge_endpoints(event_id, user_id).await?;
        self.unrelate("favorites", event_id, user_id).await?;
        Ok(())
    }
}

//! SurrealDB implementation of [`UserRepository`].
//!
//! Identifier uniqueness (email/phone/username) is enforced by the
//! registration flow through [`UserRepository::identifier_in_use`], not
//! by a storage constraint: the three identifier columns are all
//! nullable, so the check runs before insert instead.

use chrono::{DateTime, Utc};
use jcmap_core::error::JcmapResult;
use jcmap_core::models::user::{CreateUser, SocialLinks, UpdateUser, User, UserRole};
use jcmap_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
pub(crate) struct UserRowWithId {
    record_id: String,
    email: Option<String>,
    phone: Option<String>,
    username: Option<String>,
    password_hash: String,
    full_name: Option<String>,
    bio: Option<String>,
    birthday: Option<DateTime<Utc>>,
    gender: Option<String>,
    marital_status: Option<String>,
    address: Option<String>,
    job_title: Option<String>,
    avatar_url: Option<String>,
    social_links: serde_json::Value,
    role: String,
    notification_radius: u32,
    home_church: Option<String>,
    church_role: Option<String>,
    membership_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

pub(crate) fn parse_role(s: &str) -> Result<UserRole, DbError> {
    UserRole::parse(s).ok_or_else(|| DbError::Decode(format!("unknown user role: {s}")))
}

fn parse_opt_uuid(s: Option<String>, field: &str) -> Result<Option<Uuid>, DbError> {
    s.map(|v| {
        Uuid::parse_str(&v).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
    })
    .transpose()
}

impl UserRowWithId {
    pub(crate) fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let social_links: SocialLinks = serde_json::from_value(self.social_links)
            .map_err(|e| DbError::Decode(format!("invalid social links: {e}")))?;
        Ok(User {
            id,
            email: self.email,
            phone: self.phone,
            username: self.username,
            password_hash: self.password_hash,
            full_name: self.full_name,
            bio: self.bio,
            birthday: self.birthday,
            gender: self.gender,
            marital_status: self.marital_status,
            address: self.address,
            job_title: self.job_title,
            avatar_url: self.avatar_url,
            social_links,
            role: parse_role(&self.role)?,
            notification_radius: self.notification_radius,
            home_church: parse_opt_uuid(self.home_church, "home church")?,
            church_role: self.church_role,
            membership_date: self.membership_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id_str: &str) -> Result<User, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('user', $id) \
                 WHERE deleted_at = NONE",
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
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> JcmapResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        self.db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, phone = $phone, username = $username, \
                 password_hash = $password_hash, \
                 full_name = $full_name, \
                 role = $role \
                 RETURN NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("username", input.username))
            .bind(("password_hash", input.password_hash))
            .bind(("full_name", input.full_name))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> JcmapResult<User> {
        Ok(self.fetch(&id.to_string()).await?)
    }

    async fn get_by_login_identifier(&self, identifier: &str) -> JcmapResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE deleted_at = NONE AND \
                 (email = $ident OR phone = $ident OR username = $ident)",
            )
            .bind(("ident", identifier.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("identifier={identifier}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn identifier_in_use(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        username: Option<&str>,
    ) -> JcmapResult<bool> {
        let mut conds = Vec::new();
        if email.is_some() {
            conds.push("email = $email");
        }
        if phone.is_some() {
            conds.push("phone = $phone");
        }
        if username.is_some() {
            conds.push("username = $username");
        }
        if conds.is_empty() {
            return Ok(false);
        }

        let query = format!(
            "SELECT count() AS total FROM user WHERE {} GROUP ALL",
            conds.join(" OR ")
        );

        let mut builder = self.db.query(&query);
        if let Some(email) = email {
            builder = builder.bind(("email", email.to_string()));
        }
        if let Some(phone) = phone {
            builder = builder.bind(("phone", phone.to_string()));
        }
        if let Some(username) = username {
            builder = builder.bind(("username", username.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> JcmapResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.bio.is_some() {
            sets.push("bio = $bio");
        }
        if input.birthday.is_some() {
            sets.push("birthday = $birthday");
        }
        if input.gender.is_some() {
            sets.push("gender = $gender");
        }
        if input.marital_status.is_some() {
            sets.push("marital_status = $marital_status");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.job_title.is_some() {
            sets.push("job_title = $job_title");
        }
        if input.avatar_url.is_some() {
            sets.push("avatar_url = $avatar_url");
        }
        if input.social_links.is_some() {
            sets.push("social_links = $social_links");
        }
        if input.notification_radius.is_some() {
            sets.push("notification_radius = $notification_radius");
        }
        if input.home_church.is_some() {
            sets.push("home_church = $home_church");
        }
        if input.church_role.is_some() {
            sets.push("church_role = $church_role");
        }
        if input.membership_date.is_some() {
            sets.push("membership_date = $membership_date");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {} RETURN NONE",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(bio) = input.bio {
            builder = builder.bind(("bio", bio));
        }
        if let Some(birthday) = input.birthday {
            builder = builder.bind(("birthday", birthday));
        }
        if let Some(gender) = input.gender {
            builder = builder.bind(("gender", gender));
        }
        if let Some(marital_status) = input.marital_status {
            builder = builder.bind(("marital_status", marital_status));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(job_title) = input.job_title {
            builder = builder.bind(("job_title", job_title));
        }
        if let Some(avatar_url) = input.avatar_url {
            // Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("avatar_url", avatar_url));
        }
        if let Some(ref social_links) = input.social_links {
            let value = serde_json::to_value(social_links)
                .map_err(|e| DbError::Decode(format!("social links encode: {e}")))?;
            builder = builder.bind(("social_links", value));
        }
        if let Some(notification_radius) = input.notification_radius {
            builder = builder.bind(("notification_radius", notification_radius));
        }
        if let Some(home_church) = input.home_church {
            builder = builder.bind(("home_church", home_church.map(|v| v.to_string())));
        }
        if let Some(church_role) = input.church_role {
            builder = builder.bind(("church_role", church_role));
        }
        if let Some(membership_date) = input.membership_date {
            builder = builder.bind(("membership_date", membership_date));
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> JcmapResult<User> {
        let id_str = id.to_string();

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 role = $role, updated_at = time::now() RETURN NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn soft_delete(&self, id: Uuid) -> JcmapResult<()> {
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
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

    async fn list(&self) -> JcmapResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE deleted_at = NONE \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(users)
    }

    async fn list_by_home_church(&self, organization_id: Uuid) -> JcmapResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE deleted_at = NONE AND home_church = $org_id \
                 ORDER BY created_at ASC",
            )
            .bind(("org_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(users)
    }
}

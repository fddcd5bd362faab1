use std::sync::Arc;

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::core::error::{AppError, Result};
use crate::features::families::dtos::{
    CreateFamilyDto, CreateMemberDto, FamilyDetailDto, FamilyResponseDto, MemberResponseDto,
    UpdateDurationDto, UpdateFamilyDto, UpdateLocationDto, UpdateMemberDto,
};
use crate::features::families::models::{
    photo_filename, Family, Member, PhotoUpload, SubmissionChannel, FAMILY_COLUMNS,
    MEMBER_COLUMNS,
};
use crate::modules::storage::PhotoStore;
use crate::shared::types::PaginationQuery;

/// Trimmed value, or `None` when blank
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Household registry: families, their members and intake
pub struct FamilyService {
    pool: PgPool,
    photos: Arc<dyn PhotoStore>,
}

impl FamilyService {
    pub fn new(pool: PgPool, photos: Arc<dyn PhotoStore>) -> Self {
        Self { pool, photos }
    }

    /// Register a family.
    ///
    /// The id is reserved first so the photo can be stored under its final
    /// name before any transaction opens; the family row, its "target person"
    /// member and the photo path are then written in one transaction.
    /// `is_synced` always starts false; `is_validated` is true only for agent
    /// submissions.
    pub async fn create_family(
        &self,
        dto: CreateFamilyDto,
        photo: Option<PhotoUpload>,
        creator_id: Option<i64>,
        channel: SubmissionChannel,
    ) -> Result<FamilyDetailDto> {
        let family_id = self.reserve_family_id().await?;

        let stored_photo = match photo {
            Some(photo) => {
                let name = photo_filename(family_id, Utc::now().timestamp(), photo.extension());
                let content_type = photo.content_type.clone();
                Some(self.photos.save(photo.data, &name, &content_type).await?)
            }
            None => None,
        };

        let created = self
            .insert_family(family_id, &dto, stored_photo.as_deref(), creator_id, channel)
            .await;

        let (family, member) = match created {
            Ok(rows) => rows,
            Err(e) => {
                if let Some(path) = &stored_photo {
                    self.discard_photo(path).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Family {} created via {:?} by {:?} (validated={})",
            family.id,
            channel,
            creator_id,
            family.is_validated
        );

        Ok(FamilyDetailDto {
            family: family.into(),
            members: vec![member.into()],
        })
    }

    async fn reserve_family_id(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT nextval(pg_get_serial_sequence('families', 'id'))")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to reserve family id: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn insert_family(
        &self,
        family_id: i64,
        dto: &CreateFamilyDto,
        photo_path: Option<&str>,
        creator_id: Option<i64>,
        channel: SubmissionChannel,
    ) -> Result<(Family, Member)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start family transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let root = &dto.root;
        let sql = format!(
            r#"
            INSERT INTO families (
                id, name, first_name, last_name, date_of_birth, gender, nationality, id_type,
                id_number, place_of_birth, province, city, district, latitude, longitude,
                fill_duration, is_validated, is_synced, created_by_id, photo_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, FALSE, $18, $19)
            RETURNING {}
            "#,
            FAMILY_COLUMNS
        );

        let family = sqlx::query_as::<_, Family>(&sql)
            .bind(family_id)
            .bind(dto.name.trim())
            .bind(root.first_name.trim())
            .bind(root.last_name.trim())
            .bind(root.date_of_birth.trim())
            .bind(root.gender.trim())
            .bind(root.nationality.trim())
            .bind(root.id_type.trim())
            .bind(root.id_number.trim())
            .bind(root.place_of_birth.trim())
            .bind(root.province.trim())
            .bind(root.city.trim())
            .bind(root.district.trim())
            .bind(dto.latitude)
            .bind(dto.longitude)
            .bind(dto.fill_duration)
            .bind(channel.is_validated())
            .bind(creator_id)
            .bind(photo_path)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if AppError::is_foreign_key_violation(&e) {
                    AppError::NotFound("Creating user no longer exists".to_string())
                } else {
                    tracing::error!("Failed to insert family {}: {:?}", family_id, e);
                    AppError::Database(e)
                }
            })?;

        let target_person = CreateMemberDto::target_person(root);
        let member = Self::insert_member(&mut tx, family.id, &target_person).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit family {}: {:?}", family.id, e);
            AppError::Database(e)
        })?;

        Ok((family, member))
    }

    async fn discard_photo(&self, path: &str) {
        if let Err(e) = self.photos.delete(path).await {
            tracing::warn!("Failed to remove orphaned photo {}: {}", path, e);
        }
    }

    async fn insert_member(
        conn: &mut PgConnection,
        family_id: i64,
        dto: &CreateMemberDto,
    ) -> Result<Member> {
        let sql = format!(
            r#"
            INSERT INTO members (
                family_id, first_name, last_name, role, date_of_birth, gender, nationality,
                id_type, id_number, place_of_birth, province, city, district
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        );

        sqlx::query_as::<_, Member>(&sql)
            .bind(family_id)
            .bind(dto.first_name.trim())
            .bind(dto.last_name.trim())
            .bind(clean(dto.role.as_deref()))
            .bind(clean(dto.date_of_birth.as_deref()))
            .bind(clean(dto.gender.as_deref()))
            .bind(clean(dto.nationality.as_deref()))
            .bind(clean(dto.id_type.as_deref()))
            .bind(clean(dto.id_number.as_deref()))
            .bind(clean(dto.place_of_birth.as_deref()))
            .bind(clean(dto.province.as_deref()))
            .bind(clean(dto.city.as_deref()))
            .bind(clean(dto.district.as_deref()))
            .fetch_one(conn)
            .await
            .map_err(|e| {
                if AppError::is_foreign_key_violation(&e) {
                    AppError::NotFound(format!("Family {} not found", family_id))
                } else {
                    tracing::error!("Failed to insert member into family {}: {:?}", family_id, e);
                    AppError::Database(e)
                }
            })
    }

    async fn fetch_family(&self, id: i64) -> Result<Family> {
        let sql = format!("SELECT {} FROM families WHERE id = $1", FAMILY_COLUMNS);
        sqlx::query_as::<_, Family>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get family {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Family {} not found", id)))
    }

    async fn fetch_members(&self, family_id: i64) -> Result<Vec<MemberResponseDto>> {
        let sql = format!(
            "SELECT {} FROM members WHERE family_id = $1 ORDER BY id",
            MEMBER_COLUMNS
        );
        let members = sqlx::query_as::<_, Member>(&sql)
            .bind(family_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list members of family {}: {:?}", family_id, e);
                AppError::Database(e)
            })?;

        Ok(members.into_iter().map(MemberResponseDto::from).collect())
    }

    pub async fn get_family(&self, id: i64) -> Result<FamilyDetailDto> {
        let family = self.fetch_family(id).await?;
        let members = self.fetch_members(id).await?;

        Ok(FamilyDetailDto {
            family: family.into(),
            members,
        })
    }

    /// Newest first
    pub async fn list_families(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<FamilyResponseDto>, i64)> {
        let sql = format!(
            "SELECT {} FROM families ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            FAMILY_COLUMNS
        );
        let families = sqlx::query_as::<_, Family>(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list families: {:?}", e);
                AppError::Database(e)
            })?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM families")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count families: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((
            families.into_iter().map(FamilyResponseDto::from).collect(),
            total,
        ))
    }

    /// Merge update: absent fields keep their current value.
    /// Does not touch `is_synced`.
    pub async fn update_family(&self, id: i64, dto: UpdateFamilyDto) -> Result<FamilyResponseDto> {
        let sql = format!(
            r#"
            UPDATE families SET
                name = COALESCE($2, name),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                date_of_birth = COALESCE($5, date_of_birth),
                gender = COALESCE($6, gender),
                nationality = COALESCE($7, nationality),
                id_type = COALESCE($8, id_type),
                id_number = COALESCE($9, id_number),
                place_of_birth = COALESCE($10, place_of_birth),
                province = COALESCE($11, province),
                city = COALESCE($12, city),
                district = COALESCE($13, district),
                latitude = COALESCE($14, latitude),
                longitude = COALESCE($15, longitude),
                fill_duration = COALESCE($16, fill_duration)
            WHERE id = $1
            RETURNING {}
            "#,
            FAMILY_COLUMNS
        );

        let family = sqlx::query_as::<_, Family>(&sql)
            .bind(id)
            .bind(clean(dto.name.as_deref()))
            .bind(clean(dto.first_name.as_deref()))
            .bind(clean(dto.last_name.as_deref()))
            .bind(clean(dto.date_of_birth.as_deref()))
            .bind(clean(dto.gender.as_deref()))
            .bind(clean(dto.nationality.as_deref()))
            .bind(clean(dto.id_type.as_deref()))
            .bind(clean(dto.id_number.as_deref()))
            .bind(clean(dto.place_of_birth.as_deref()))
            .bind(clean(dto.province.as_deref()))
            .bind(clean(dto.city.as_deref()))
            .bind(clean(dto.district.as_deref()))
            .bind(dto.latitude)
            .bind(dto.longitude)
            .bind(dto.fill_duration)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update family {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Family {} not found", id)))?;

        tracing::info!("Family {} updated", id);
        Ok(family.into())
    }

    pub async fn update_location(
        &self,
        id: i64,
        dto: UpdateLocationDto,
    ) -> Result<FamilyResponseDto> {
        self.update_family(
            id,
            UpdateFamilyDto {
                latitude: Some(dto.latitude),
                longitude: Some(dto.longitude),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn update_duration(
        &self,
        id: i64,
        dto: UpdateDurationDto,
    ) -> Result<FamilyResponseDto> {
        self.update_family(
            id,
            UpdateFamilyDto {
                fill_duration: Some(dto.fill_duration),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a family; its members go with it (ON DELETE CASCADE)
    pub async fn delete_family(&self, id: i64) -> Result<()> {
        let photo_path = sqlx::query_scalar::<_, Option<String>>(
            "DELETE FROM families WHERE id = $1 RETURNING photo_path",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete family {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Family {} not found", id)))?;

        if let Some(path) = photo_path {
            self.discard_photo(&path).await;
        }

        tracing::info!("Family {} deleted", id);
        Ok(())
    }

    pub async fn add_member(
        &self,
        family_id: i64,
        dto: CreateMemberDto,
    ) -> Result<MemberResponseDto> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {:?}", e);
            AppError::Database(e)
        })?;

        let member = Self::insert_member(&mut conn, family_id, &dto).await?;

        tracing::info!("Member {} added to family {}", member.id, family_id);
        Ok(member.into())
    }

    pub async fn list_members(&self, family_id: i64) -> Result<Vec<MemberResponseDto>> {
        self.fetch_family(family_id).await?;
        self.fetch_members(family_id).await
    }

    /// Merge update of one member; the pair must match an existing row
    pub async fn update_member(
        &self,
        family_id: i64,
        member_id: i64,
        dto: UpdateMemberDto,
    ) -> Result<MemberResponseDto> {
        let sql = format!(
            r#"
            UPDATE members SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                role = COALESCE($5, role),
                date_of_birth = COALESCE($6, date_of_birth),
                gender = COALESCE($7, gender),
                nationality = COALESCE($8, nationality),
                id_type = COALESCE($9, id_type),
                id_number = COALESCE($10, id_number),
                place_of_birth = COALESCE($11, place_of_birth),
                province = COALESCE($12, province),
                city = COALESCE($13, city),
                district = COALESCE($14, district)
            WHERE id = $1 AND family_id = $2
            RETURNING {}
            "#,
            MEMBER_COLUMNS
        );

        let member = sqlx::query_as::<_, Member>(&sql)
            .bind(member_id)
            .bind(family_id)
            .bind(clean(dto.first_name.as_deref()))
            .bind(clean(dto.last_name.as_deref()))
            .bind(clean(dto.role.as_deref()))
            .bind(clean(dto.date_of_birth.as_deref()))
            .bind(clean(dto.gender.as_deref()))
            .bind(clean(dto.nationality.as_deref()))
            .bind(clean(dto.id_type.as_deref()))
            .bind(clean(dto.id_number.as_deref()))
            .bind(clean(dto.place_of_birth.as_deref()))
            .bind(clean(dto.province.as_deref()))
            .bind(clean(dto.city.as_deref()))
            .bind(clean(dto.district.as_deref()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update member {}: {:?}", member_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Member {} not found in family {}",
                    member_id, family_id
                ))
            })?;

        tracing::info!("Member {} of family {} updated", member_id, family_id);
        Ok(member.into())
    }

    /// Delete one member; never touches the family row
    pub async fn delete_member(&self, family_id: i64, member_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1 AND family_id = $2")
            .bind(member_id)
            .bind(family_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete member {}: {:?}", member_id, e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member {} not found in family {}",
                member_id, family_id
            )));
        }

        tracing::info!("Member {} deleted from family {}", member_id, family_id);
        Ok(())
    }
}

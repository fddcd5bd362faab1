use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::duplicates::{dtos as duplicates_dtos, handlers as duplicates_handlers};
use crate::features::families::{dtos as families_dtos, handlers as families_handlers};
use crate::features::statistics::{dtos as statistics_dtos, handlers as statistics_handlers};
use crate::features::sync::{dtos as sync_dtos, handlers as sync_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::features::zones::{dtos as zones_dtos, handlers as zones_handlers};
use crate::shared::types::{AffectedCountDto, ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::get_me,
        // Users & provinces
        users_handlers::create_user,
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::delete_user,
        users_handlers::list_provinces,
        // Families
        families_handlers::create_family,
        families_handlers::create_family_offline,
        families_handlers::submit_public_family,
        families_handlers::list_families,
        families_handlers::get_family,
        families_handlers::update_family,
        families_handlers::update_location,
        families_handlers::update_duration,
        families_handlers::delete_family,
        families_handlers::list_members,
        families_handlers::add_member,
        families_handlers::update_member,
        families_handlers::delete_member,
        // Duplicates
        duplicates_handlers::list_duplicates,
        duplicates_handlers::resolve_group,
        duplicates_handlers::resolve_single,
        // Sync
        sync_handlers::get_pending,
        sync_handlers::get_status,
        sync_handlers::force_sync,
        // Zones
        zones_handlers::assign_zone,
        zones_handlers::list_zones,
        zones_handlers::update_zone,
        zones_handlers::import_zones_file,
        zones_handlers::import_zone_rows,
        zones_handlers::search_users,
        // Statistics
        statistics_handlers::page_stats,
        statistics_handlers::overview,
        statistics_handlers::agent_activity,
    ),
    components(
        schemas(
            // Shared
            Meta,
            AffectedCountDto,
            ApiResponse<AffectedCountDto>,
            // Auth
            auth_model::Role,
            auth_model::AuthenticatedUser,
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::AuthUserDto,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::AuthUserDto>,
            // Users
            users_dtos::CreateUserDto,
            users_dtos::UserResponseDto,
            users_dtos::ProvinceResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<Vec<users_dtos::ProvinceResponseDto>>,
            // Families
            families_dtos::RootPersonDto,
            families_dtos::OfflinePhotoDto,
            families_dtos::CreateFamilyDto,
            families_dtos::UpdateFamilyDto,
            families_dtos::UpdateLocationDto,
            families_dtos::UpdateDurationDto,
            families_dtos::FamilyResponseDto,
            families_dtos::FamilyDetailDto,
            families_dtos::CreateMemberDto,
            families_dtos::UpdateMemberDto,
            families_dtos::MemberResponseDto,
            ApiResponse<families_dtos::FamilyResponseDto>,
            ApiResponse<families_dtos::FamilyDetailDto>,
            ApiResponse<Vec<families_dtos::FamilyResponseDto>>,
            ApiResponse<families_dtos::MemberResponseDto>,
            ApiResponse<Vec<families_dtos::MemberResponseDto>>,
            // Duplicates
            duplicates_dtos::DuplicateGroupDto,
            duplicates_dtos::ResolveGroupDto,
            duplicates_dtos::ResolveOutcomeDto,
            ApiResponse<Vec<duplicates_dtos::DuplicateGroupDto>>,
            ApiResponse<duplicates_dtos::ResolveOutcomeDto>,
            // Sync
            sync_dtos::PendingFamilyDto,
            sync_dtos::SyncStatusDto,
            ApiResponse<sync_dtos::SyncStatusDto>,
            // Zones
            zones_dtos::AssignZoneDto,
            zones_dtos::UpdateZoneDto,
            zones_dtos::ImportZonesFileDto,
            zones_dtos::ImportZoneRowsDto,
            zones_dtos::ZoneImportResultDto,
            zones_dtos::ZoneOwnerDto,
            zones_dtos::ZoneResponseDto,
            ApiResponse<zones_dtos::ZoneResponseDto>,
            ApiResponse<Vec<zones_dtos::ZoneResponseDto>>,
            ApiResponse<zones_dtos::ZoneImportResultDto>,
            ApiResponse<Vec<zones_dtos::ZoneOwnerDto>>,
            // Statistics
            statistics_dtos::PageStatsDto,
            statistics_dtos::OverviewDto,
            statistics_dtos::AgentActivityDto,
            ApiResponse<statistics_dtos::PageStatsDto>,
            ApiResponse<statistics_dtos::OverviewDto>,
            ApiResponse<Vec<statistics_dtos::AgentActivityDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Login and current identity"),
        (name = "users", description = "Accounts and provinces"),
        (name = "families", description = "Household registry: families and members"),
        (name = "duplicates", description = "Duplicate member detection and cleanup (supervisors)"),
        (name = "sync", description = "Per-agent synchronization state"),
        (name = "zones", description = "Survey zone assignment"),
        (name = "statistics", description = "Aggregate rollups"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Census Registry API",
        version = "0.1.0",
        description = "Household registration, duplicate detection and zone assignment",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_feature() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/auth/login",
            "/api/families",
            "/api/public/families",
            "/api/duplicates",
            "/api/sync/force",
            "/api/zones/import",
            "/api/stats",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}

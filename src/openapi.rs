use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FreightDesk API",
        version = "0.3.0",
        description = r#"
# FreightDesk Back-Office API

Back-office API for freight-forwarding operations: client and vendor
masters, zone rate cards, shipment data entry, and bill generation.

## Conventions

- Weights are kilograms; box dimensions are centimetres.
- Volumetric weight per piece is `L x B x H x CFT / 27000` for surface
  and `L x B x H / 5000` for air; express shipments carry no volumetric
  weight.
- Money values are fixed-point decimals rounded to 2 places.

## Pagination

List endpoints accept `page` (default 1) and `limit` (default 20,
max 100) query parameters.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "clients", description = "Client master endpoints"),
        (name = "vendors", description = "Vendor master and serviceability endpoints"),
        (name = "zones", description = "Rating zone endpoints"),
        (name = "rates", description = "Rate card and quote endpoints"),
        (name = "shipments", description = "Shipment entry endpoints"),
        (name = "bills", description = "Bill generation endpoints")
    ),
    paths(
        // Clients
        crate::handlers::clients::list_clients,
        crate::handlers::clients::get_client,
        crate::handlers::clients::create_client,
        crate::handlers::clients::update_client,
        crate::handlers::clients::delete_client,

        // Vendors
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::get_vendor,
        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::update_vendor,
        crate::handlers::vendors::delete_vendor,
        crate::handlers::vendors::list_pincodes,
        crate::handlers::vendors::add_pincode,
        crate::handlers::vendors::remove_pincode,
        crate::handlers::vendors::check_serviceability,

        // Zones
        crate::handlers::zones::list_zones,
        crate::handlers::zones::get_zone,
        crate::handlers::zones::create_zone,

        // Rates
        crate::handlers::rates::create_rate_master,
        crate::handlers::rates::rates_for_client,
        crate::handlers::rates::update_rate_master,
        crate::handlers::rates::get_rate_quote,

        // Shipments
        crate::handlers::shipments::list_shipments,
        crate::handlers::shipments::get_shipment,
        crate::handlers::shipments::create_shipment,
        crate::handlers::shipments::update_shipment,
        crate::handlers::shipments::delete_shipment,

        // Bills
        crate::handlers::bills::generate_bill,
        crate::handlers::bills::list_bills,
        crate::handlers::bills::get_bill,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,

            // Client types
            crate::handlers::clients::ClientResponse,
            crate::services::clients::CreateClientRequest,
            crate::services::clients::UpdateClientRequest,

            // Vendor types
            crate::handlers::vendors::VendorResponse,
            crate::handlers::vendors::VendorPincodeResponse,
            crate::handlers::vendors::ServiceabilityResponse,
            crate::services::vendors::CreateVendorRequest,
            crate::services::vendors::UpdateVendorRequest,
            crate::services::vendors::AddPincodeRequest,
            crate::entities::vendor_pincode::OdaStatus,

            // Zone types
            crate::handlers::zones::ZoneResponse,
            crate::services::zones::CreateZoneRequest,

            // Rate types
            crate::handlers::rates::RateMasterResponse,
            crate::handlers::rates::ZoneRateResponse,
            crate::services::rates::CreateRateMasterRequest,
            crate::services::rates::UpdateRateMasterRequest,
            crate::services::rates::ZoneRateInput,
            crate::rating::charges::RateQuote,
            crate::rating::TransportMode,

            // Shipment types
            crate::handlers::shipments::ShipmentSummary,
            crate::handlers::shipments::ShipmentResponse,
            crate::handlers::shipments::ShipmentBoxResponse,
            crate::services::shipments::ShipmentInput,
            crate::rating::boxes::BoxInput,
            crate::rating::boxes::BoxWeights,

            // Bill types
            crate::handlers::bills::BillResponse,
            crate::services::billing::GenerateBillRequest,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_covers_all_surfaces() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("FreightDesk API"));
        assert!(json.contains("/api/v1/shipments"));
        assert!(json.contains("/api/v1/bills/generate"));
        assert!(json.contains("/api/v1/rates/quote"));
    }
}

use serde::de::DeserializeOwned;

use super::{ApiClient, ApiRequest, Transport};
use crate::error::Result;
use crate::forms::{CommissionPayload, InvoicePayload, OrderPayload, RatingPayload};
use crate::models::{
    Commission, Customer, Employee, Invoice, Proforma, Rating, RatingStats, User, WorkOrder,
};
use crate::reports::{ExportFormat, Period, ReportKind};

fn with_params(mut request: ApiRequest, params: Vec<(&'static str, String)>) -> ApiRequest {
    for (key, value) in params {
        request = request.query(key, value);
    }
    request
}

impl<T: Transport> ApiClient<T> {
    pub fn commissions(&self) -> Result<Vec<Commission>> {
        self.fetch_list(&ApiRequest::get("comisiones"), "comisiones")
    }

    pub fn create_commission(&self, payload: &CommissionPayload) -> Result<()> {
        self.send(&ApiRequest::post("comisiones", payload)?)?;
        Ok(())
    }

    pub fn update_commission(&self, id: &str, payload: &CommissionPayload) -> Result<()> {
        self.send(&ApiRequest::put(format!("comisiones/{id}"), payload)?)?;
        Ok(())
    }

    pub fn orders(&self) -> Result<Vec<WorkOrder>> {
        self.fetch_list(&ApiRequest::get("ordenes-trabajo"), "ordenes")
    }

    pub fn create_order(&self, payload: &OrderPayload) -> Result<()> {
        self.send(&ApiRequest::post("ordenes-trabajo", payload)?)?;
        Ok(())
    }

    pub fn update_order(&self, id: &str, payload: &OrderPayload) -> Result<()> {
        self.send(&ApiRequest::put(format!("ordenes-trabajo/{id}"), payload)?)?;
        Ok(())
    }

    pub fn delete_order(&self, id: &str) -> Result<()> {
        self.send(&ApiRequest::delete(format!("ordenes-trabajo/{id}")))?;
        Ok(())
    }

    pub fn invoices(&self) -> Result<Vec<Invoice>> {
        self.fetch_list(&ApiRequest::get("facturas"), "facturas")
    }

    pub fn create_invoice(&self, payload: &InvoicePayload) -> Result<()> {
        self.send(&ApiRequest::post("facturas", payload)?)?;
        Ok(())
    }

    pub fn update_invoice(&self, number: &str, payload: &InvoicePayload) -> Result<()> {
        self.send(&ApiRequest::put(format!("facturas/{number}"), payload)?)?;
        Ok(())
    }

    pub fn void_invoice(&self, number: &str) -> Result<()> {
        self.send(&ApiRequest::patch(format!("facturas/{number}/anular")))?;
        Ok(())
    }

    pub fn delete_invoice(&self, number: &str) -> Result<()> {
        self.send(&ApiRequest::delete(format!("facturas/{number}")))?;
        Ok(())
    }

    fn invoice_pdf_request(number: &str) -> ApiRequest {
        ApiRequest::get(format!("facturas/{number}/pdf")).token_in_query()
    }

    pub fn invoice_pdf(&self, number: &str) -> Result<Vec<u8>> {
        self.download(&Self::invoice_pdf_request(number))
    }

    pub fn invoice_pdf_url(&self, number: &str) -> Result<String> {
        self.url_for(&Self::invoice_pdf_request(number))
    }

    pub fn customers(&self) -> Result<Vec<Customer>> {
        self.fetch_list(&ApiRequest::get("clientes"), "clientes")
    }

    pub fn employees(&self) -> Result<Vec<Employee>> {
        self.fetch_list(&ApiRequest::get("empleados"), "empleados")
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.fetch_list(&ApiRequest::get("usuarios"), "usuarios")
    }

    pub fn proformas(&self) -> Result<Vec<Proforma>> {
        self.fetch_list(&ApiRequest::get("proformas"), "proformas")
    }

    pub fn ratings(&self) -> Result<Vec<Rating>> {
        self.fetch_list(&ApiRequest::get("valoraciones"), "valoraciones")
    }

    pub fn rating_stats(&self) -> Result<RatingStats> {
        self.fetch(&ApiRequest::get("valoraciones/estadisticas"))
    }

    pub fn delete_rating(&self, id: &str) -> Result<()> {
        self.send(&ApiRequest::delete(format!("valoraciones/{id}")))?;
        Ok(())
    }

    /// Public submission; works without a credential
    pub fn submit_rating(&self, payload: &RatingPayload) -> Result<()> {
        self.send(&ApiRequest::post("valoraciones", payload)?.public())?;
        Ok(())
    }

    pub fn report<R: DeserializeOwned>(&self, kind: ReportKind, period: Period) -> Result<R> {
        self.fetch(&with_params(ApiRequest::get(kind.path()), kind.params(period)))
    }

    fn export_request(kind: ReportKind, period: Period, format: ExportFormat) -> ApiRequest {
        with_params(
            ApiRequest::get(kind.export_path(format)),
            kind.params(period),
        )
        .token_in_query()
    }

    pub fn export_url(&self, kind: ReportKind, period: Period, format: ExportFormat) -> Result<String> {
        self.url_for(&Self::export_request(kind, period, format))
    }

    pub fn export_report(
        &self,
        kind: ReportKind,
        period: Period,
        format: ExportFormat,
    ) -> Result<Vec<u8>> {
        self.download(&Self::export_request(kind, period, format))
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{client, FakeTransport};
    use crate::api::Method;
    use crate::forms::RatingForm;
    use crate::reports::{ExportFormat, FrequentCustomersReport, Period, ReportKind};
    use serde_json::json;

    #[test]
    fn invoices_unwrap_envelope() {
        let api = client(FakeTransport::default().respond(
            200,
            json!({"facturas": [{"nro": 1, "estado": "EMITIDA", "total": "20"}]}),
        ));
        let invoices = api.invoices().unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].total, 20.0);
    }

    #[test]
    fn commissions_accept_bare_array() {
        let api = client(FakeTransport::default().respond(200, json!([{"id": 1, "monto": 5}])));
        assert_eq!(api.commissions().unwrap().len(), 1);
        assert_eq!(api.transport().last().url, "http://backend.test/api/comisiones");
    }

    #[test]
    fn void_uses_patch() {
        let api = client(FakeTransport::default());
        api.void_invoice("15").unwrap();
        let req = api.transport().last();
        assert_eq!(req.method, Method::Patch);
        assert!(req.url.ends_with("/facturas/15/anular"));
    }

    #[test]
    fn report_sends_period() {
        let api = client(FakeTransport::default().respond(
            200,
            json!({"mesNombre": "Marzo", "totalClientes": 1, "clientes": []}),
        ));
        let period = Period::new(3, 2025).unwrap();
        let report: FrequentCustomersReport =
            api.report(ReportKind::FrequentCustomers, period).unwrap();
        assert_eq!(report.total_clientes, 1);
        assert_eq!(
            api.transport().last().url,
            "http://backend.test/api/reportes/clientes-frecuentes?mes=3&anio=2025"
        );
    }

    #[test]
    fn export_url_carries_token() {
        let api = client(FakeTransport::default());
        let url = api
            .export_url(
                ReportKind::MonthlyIncome,
                Period::new(1, 2024).unwrap(),
                ExportFormat::Pdf,
            )
            .unwrap();
        assert_eq!(
            url,
            "http://backend.test/api/reportes/export/ingresos-pdf?anio=2024&token=tok%20en"
        );
    }

    #[test]
    fn rating_submission_is_public() {
        let api = client(FakeTransport::default().respond(201, json!({"id": 9})));
        let payload = RatingForm {
            score: 5,
            ..RatingForm::default()
        }
        .validate()
        .unwrap();
        api.submit_rating(&payload).unwrap();
        assert!(api.transport().last().header("Authorization").is_none());
    }
}

//! WhatsApp click-to-chat links.

use crate::error::{Result, TallerError};
use crate::format::display_date;
use crate::models::WorkOrder;

const WA_BASE: &str = "https://wa.me";
const COUNTRY_CODE: &str = "591";

/// Digits only, with the country code added to bare 8-digit local numbers
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 && !digits.starts_with(COUNTRY_CODE) {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

/// "Your motorcycle is ready" message for a finished order
pub fn ready_message(order: &WorkOrder) -> String {
    let customer = order
        .customer()
        .map(|c| c.full_name())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "cliente".to_string());
    let moto = order.proforma().and_then(|p| p.motorcycle());
    let model = moto
        .and_then(|m| m.model.as_deref())
        .unwrap_or("N/A");
    let plate = moto
        .and_then(|m| m.plate.as_deref())
        .unwrap_or("N/A");
    let mechanic = order
        .employee
        .as_ref()
        .map(|e| e.full_name())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Hola {customer}, le informamos que su motocicleta {model} (placa {plate}) está lista para ser recogida.\n\
         Orden de trabajo: #{id}\n\
         Mecánico: {mechanic}\n\
         Fecha de finalización: {end}\n\
         ¡Gracias por confiar en nosotros!",
        id = order.id,
        end = display_date(order.finished_on.as_deref()),
    )
}

/// Link that opens a chat with `phone` and the text prefilled
pub fn wa_link(phone: &str, text: &str) -> String {
    format!(
        "{WA_BASE}/{}?text={}",
        normalize_phone(phone),
        urlencoding::encode(text)
    )
}

/// Link that lets the sender pick the recipient
pub fn share_link(text: &str) -> String {
    format!("{WA_BASE}/?text={}", urlencoding::encode(text))
}

/// Pickup notice link for the customer of `order`
pub fn notify_link(order: &WorkOrder) -> Result<String> {
    let phone = order
        .customer()
        .and_then(|c| c.phone.as_deref())
        .map(normalize_phone)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| TallerError::MissingPhone(order.id.clone()))?;
    Ok(wa_link(&phone, &ready_message(order)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finished_order(phone: serde_json::Value) -> WorkOrder {
        serde_json::from_value(json!({
            "id": 42,
            "fechaFin": "2025-05-09T00:00:00.000Z",
            "estado": "FINALIZADA",
            "empleado": {"ci": 1, "nombre": "Luis", "apellidos": "Rojas"},
            "detalle": {"proforma": {
                "id": 9,
                "cliente": {"ci": 7, "nombre": "Marta", "apellidos": "Vargas", "telefono": phone},
                "diagnostico": {"moto": {"modelo": "XR150", "placa": "1234-ABC"}}
            }}
        }))
        .unwrap()
    }

    #[test]
    fn local_numbers_get_country_code() {
        assert_eq!(normalize_phone("7123 4567"), "59171234567");
        assert_eq!(normalize_phone("+591 71234567"), "59171234567");
        assert_eq!(normalize_phone("(0) 123-45"), "012345");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn message_names_everything_the_customer_needs() {
        let order = finished_order(json!(71234567));
        let text = ready_message(&order);
        assert!(text.contains("Hola Marta Vargas"));
        assert!(text.contains("XR150 (placa 1234-ABC)"));
        assert!(text.contains("#42"));
        assert!(text.contains("Luis Rojas"));
        assert!(text.contains("09/05/2025"));
    }

    #[test]
    fn notify_link_is_encoded() {
        let link = notify_link(&finished_order(json!("71234567"))).unwrap();
        assert!(link.starts_with("https://wa.me/59171234567?text=Hola%20Marta"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn notify_without_phone_fails() {
        let err = notify_link(&finished_order(json!(null))).unwrap_err();
        assert!(matches!(err, TallerError::MissingPhone(id) if id == "42"));
    }

    #[test]
    fn share_link_has_no_recipient() {
        assert_eq!(share_link("a b"), "https://wa.me/?text=a%20b");
    }
}

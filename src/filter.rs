//! Client-side search and status filtering for list views.

use crate::models::{Invoice, InvoiceStatus, OrderStatus, WorkOrder};

/// A record that can be narrowed by free text and status
pub trait Filterable {
    type Status: PartialEq;

    /// Identifier matched as a substring, as typed
    fn id_text(&self) -> &str;
    /// Names matched case-insensitively
    fn names(&self) -> Vec<&str>;
    fn status(&self) -> Option<&Self::Status>;
}

impl Filterable for WorkOrder {
    type Status = OrderStatus;

    fn id_text(&self) -> &str {
        &self.id
    }

    fn names(&self) -> Vec<&str> {
        self.employee
            .as_ref()
            .map(|e| vec![e.name.as_str(), e.surname.as_str()])
            .unwrap_or_default()
    }

    fn status(&self) -> Option<&OrderStatus> {
        self.status.as_ref()
    }
}

impl Filterable for Invoice {
    type Status = InvoiceStatus;

    fn id_text(&self) -> &str {
        &self.number
    }

    fn names(&self) -> Vec<&str> {
        self.customer
            .as_ref()
            .map(|c| vec![c.name.as_str(), c.surname.as_str()])
            .unwrap_or_default()
    }

    fn status(&self) -> Option<&InvoiceStatus> {
        self.status.as_ref()
    }
}

/// Search text plus optional exact status
#[derive(Debug, Clone)]
pub struct ListFilter<S> {
    search: String,
    status: Option<S>,
}

impl<S: PartialEq> ListFilter<S> {
    pub fn new(search: Option<&str>, status: Option<S>) -> Self {
        Self {
            search: search.map(str::trim).unwrap_or_default().to_string(),
            status,
        }
    }

    pub fn matches<T: Filterable<Status = S>>(&self, item: &T) -> bool {
        self.matches_search(item) && self.matches_status(item)
    }

    fn matches_search<T: Filterable<Status = S>>(&self, item: &T) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        item.id_text().contains(&self.search)
            || item
                .names()
                .iter()
                .any(|name| name.to_lowercase().contains(&needle))
    }

    fn matches_status<T: Filterable<Status = S>>(&self, item: &T) -> bool {
        match &self.status {
            None => true,
            Some(wanted) => item.status() == Some(wanted),
        }
    }

    pub fn apply<'a, T: Filterable<Status = S>>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders() -> Vec<WorkOrder> {
        serde_json::from_value(json!([
            {"id": 101, "estado": "ABIERTA", "empleado": {"ci": 1, "nombre": "Luis", "apellidos": "Rojas"}},
            {"id": 202, "estado": "FINALIZADA", "empleado": {"ci": 2, "nombre": "Ana", "apellidos": "Quispe"}},
            {"id": 310, "estado": "FINALIZADA"}
        ]))
        .unwrap()
    }

    fn ids<T: Filterable>(items: Vec<&T>) -> Vec<String> {
        items.iter().map(|i| i.id_text().to_string()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let orders = orders();
        let filter = ListFilter::<OrderStatus>::new(None, None);
        assert_eq!(filter.apply(&orders).len(), 3);

        let blank = ListFilter::<OrderStatus>::new(Some("   "), None);
        assert_eq!(blank.apply(&orders).len(), 3);
    }

    #[test]
    fn search_matches_id_or_names() {
        let orders = orders();
        assert_eq!(ids(ListFilter::<OrderStatus>::new(Some("10"), None).apply(&orders)), vec!["101", "310"]);
        assert_eq!(ids(ListFilter::<OrderStatus>::new(Some("quis"), None).apply(&orders)), vec!["202"]);
        assert_eq!(ids(ListFilter::<OrderStatus>::new(Some("LUIS"), None).apply(&orders)), vec!["101"]);
        assert!(ListFilter::<OrderStatus>::new(Some("zzz"), None).apply(&orders).is_empty());
    }

    #[test]
    fn status_is_exact_and_combines_with_search() {
        let orders = orders();
        let finished = ListFilter::new(None, Some(OrderStatus::Finished));
        assert_eq!(ids(finished.apply(&orders)), vec!["202", "310"]);

        let both = ListFilter::new(Some("ana"), Some(OrderStatus::Finished));
        assert_eq!(ids(both.apply(&orders)), vec!["202"]);
    }

    #[test]
    fn invoices_search_customer_names() {
        let invoices: Vec<Invoice> = serde_json::from_value(json!([
            {"nro": 7, "estado": "EMITIDA", "cliente": {"ci": 1, "nombre": "Marta", "apellidos": "Vargas"}},
            {"nro": 8, "estado": "ANULADA", "cliente": {"ci": 2, "nombre": "Pedro", "apellidos": "Mamani"}}
        ]))
        .unwrap();

        let void = ListFilter::new(None, Some(InvoiceStatus::Void));
        assert_eq!(ids(void.apply(&invoices)), vec!["8"]);
        assert_eq!(ids(ListFilter::<InvoiceStatus>::new(Some("varg"), None).apply(&invoices)), vec!["7"]);
    }
}

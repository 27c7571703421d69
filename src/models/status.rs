//! Status fields as the backend spells them.
//!
//! Each enum keeps unknown wire values in `Other` instead of failing, so a
//! new status on the server never breaks a listing.

macro_rules! wire_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal, $label:literal $(, $alias:literal)*;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
        #[serde(from = "serde_json::Value", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            /// Value sent to and received from the backend
            pub fn as_wire(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(raw) => raw,
                }
            }

            /// Human readable name
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<serde_json::Value> for $name {
            fn from(value: serde_json::Value) -> Self {
                match value {
                    serde_json::Value::String(raw) => raw.into(),
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> String {
                status.as_wire().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            /// Accepts the wire value or its English alias, in any case
            fn from_str(input: &str) -> Result<Self, Self::Err> {
                let normalized = input.trim().to_ascii_lowercase().replace(['-', ' '], "_");
                $(
                    if normalized == $wire.to_ascii_lowercase() $(|| normalized == $alias)* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!(
                    "unknown status '{input}' (expected one of: {})",
                    [$($wire),+].join(", ")
                ))
            }
        }
    };
}

wire_status! {
    /// Payment state of a commission
    CommissionStatus {
        Pending => "PENDIENTE", "Pending", "pending";
        Paid => "PAGADO", "Paid", "paid";
        Cancelled => "CANCELADO", "Cancelled", "cancelled", "canceled";
    }
}

wire_status! {
    /// Lifecycle of a work order
    OrderStatus {
        Open => "ABIERTA", "Open", "open";
        InProgress => "EN_PROCESO", "In progress", "in_progress";
        Finished => "FINALIZADA", "Finished", "finished";
        Cancelled => "CANCELADA", "Cancelled", "cancelled", "canceled";
    }
}

wire_status! {
    /// Lifecycle of an invoice
    InvoiceStatus {
        Issued => "EMITIDA", "Issued", "issued";
        Void => "ANULADA", "Void", "void";
    }
}

wire_status! {
    /// Approval state of a quotation
    ProformaStatus {
        Pending => "PENDIENTE", "Pending", "pending";
        Approved => "APROBADA", "Approved", "approved";
        Completed => "COMPLETADA", "Completed", "completed";
    }
}

impl ProformaStatus {
    /// Only approved or completed quotations can be invoiced
    pub fn is_billable(&self) -> bool {
        matches!(self, ProformaStatus::Approved | ProformaStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_wire_values_are_kept() {
        let status: CommissionStatus = serde_json::from_str("\"EN_REVISION\"").unwrap();
        assert_eq!(status, CommissionStatus::Other("EN_REVISION".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"EN_REVISION\"");
    }

    #[test]
    fn non_string_wire_values_fall_back_to_other() {
        let status: CommissionStatus = serde_json::from_str("1").unwrap();
        assert_eq!(status, CommissionStatus::Other("1".to_string()));

        let status: OrderStatus = serde_json::from_str("{\"code\":3}").unwrap();
        assert!(matches!(status, OrderStatus::Other(_)));
    }

    #[test]
    fn cli_input_accepts_wire_and_alias() {
        assert_eq!("PAGADO".parse::<CommissionStatus>(), Ok(CommissionStatus::Paid));
        assert_eq!("paid".parse::<CommissionStatus>(), Ok(CommissionStatus::Paid));
        assert_eq!("in-progress".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
        assert_eq!("en_proceso".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
        assert_eq!("Void".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Void));

        let err = "done".parse::<OrderStatus>().unwrap_err();
        assert!(err.contains("ABIERTA, EN_PROCESO, FINALIZADA, CANCELADA"));
    }

    #[test]
    fn serializes_wire_value() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Finished).unwrap(),
            "\"FINALIZADA\""
        );
        assert_eq!(OrderStatus::InProgress.label(), "In progress");
    }

    #[test]
    fn billable_proformas() {
        assert!(ProformaStatus::Approved.is_billable());
        assert!(ProformaStatus::Completed.is_billable());
        assert!(!ProformaStatus::Pending.is_billable());
        assert!(!ProformaStatus::Other("RECHAZADA".into()).is_billable());
    }
}

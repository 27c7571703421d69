use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{amount_from_value, id_string, lenient_amount, lenient_count, opt_lenient_string};

/// Customer feedback left through the public rating page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rating {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "fecha", default, deserialize_with = "opt_lenient_string")]
    pub date: Option<String>,
    #[serde(rename = "nombre", default, deserialize_with = "opt_lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "correo", default, deserialize_with = "opt_lenient_string")]
    pub email: Option<String>,
    #[serde(rename = "calificacion", default, deserialize_with = "lenient_count")]
    pub score: u64,
    #[serde(rename = "comentario", default, deserialize_with = "opt_lenient_string")]
    pub comment: Option<String>,
}

impl Rating {
    pub fn author(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Anonymous")
    }
}

/// Server-side rating statistics
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingStats {
    #[serde(rename = "totalValoraciones", default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(rename = "promedioCalificacion", default, deserialize_with = "lenient_amount")]
    pub average: f64,
    #[serde(rename = "distribucion", default)]
    pub distribution: HashMap<String, Value>,
}

impl RatingStats {
    /// Number of ratings with the given score
    pub fn count_for(&self, score: u8) -> u64 {
        self.distribution
            .get(&score.to_string())
            .map(amount_from_value)
            .map(|v| v.max(0.0).round() as u64)
            .unwrap_or(0)
    }

    /// Share of all ratings with the given score, zero when there are none
    pub fn share_for(&self, score: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count_for(score) as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn distribution_shares() {
        let stats: RatingStats = serde_json::from_value(json!({
            "totalValoraciones": 4,
            "promedioCalificacion": "4.25",
            "distribucion": {"5": 2, "4": "1", "3": 1}
        }))
        .unwrap();

        assert_eq!(stats.average, 4.25);
        assert_eq!(stats.count_for(4), 1);
        assert_eq!(stats.count_for(1), 0);
        assert_eq!(stats.share_for(5), 0.5);
    }

    #[test]
    fn empty_stats_never_divide_by_zero() {
        let stats: RatingStats = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.share_for(5), 0.0);
    }

    #[test]
    fn anonymous_author() {
        let rating: Rating =
            serde_json::from_value(json!({"id": 1, "calificacion": 5, "nombre": "  "})).unwrap();
        assert_eq!(rating.author(), "Anonymous");
        assert_eq!(rating.score, 5);
    }
}

use std::fmt::{Display, Formatter};

use crate::part::PartId;

#[derive(Debug, Clone)]
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct HeadId(String);

#[derive(Debug, Clone)]
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NozzleId(String);

impl Display for HeadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for NozzleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for NozzleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Head {
    pub id: HeadId,
    pub nozzles: Vec<Nozzle>,
}

impl Head {
    pub fn new(id: HeadId, nozzle_ids: &[&str]) -> Self {
        let nozzles = nozzle_ids
            .iter()
            .map(|nozzle_id| Nozzle::new(NozzleId::from(*nozzle_id), id.clone()))
            .collect();

        Self {
            id,
            nozzles,
        }
    }
}

/// Holds at most one part at a time.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Nozzle {
    pub id: NozzleId,
    pub head_id: HeadId,
    #[serde(default)]
    pub part: Option<PartId>,
}

impl Nozzle {
    pub fn new(id: NozzleId, head_id: HeadId) -> Self {
        Self {
            id,
            head_id,
            part: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.part.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_head_has_empty_nozzles() {
        // when
        let head = Head::new(HeadId::from("H1"), &["N1", "N2"]);

        // then
        assert_eq!(head.nozzles.len(), 2);
        assert!(head
            .nozzles
            .iter()
            .all(|nozzle| nozzle.is_empty() && nozzle.head_id == HeadId::from("H1")));
        assert_eq!(head.nozzles[1].id, NozzleId::from("N2"));
    }
}

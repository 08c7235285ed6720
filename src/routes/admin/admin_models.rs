use serde::Serialize;

// Row counts removed by a full reset
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct DeletedCounts {
    pub listings: u64,
    pub hosts: u64,
}

impl DeletedCounts {
    pub fn message(&self) -> String {
        format!(
            "All data deleted: {} listings and {} hosts removed.",
            self.listings, self.hosts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_reports_counts() {
        let counts = DeletedCounts {
            listings: 6,
            hosts: 5,
        };
        assert_eq!(counts.message(), "All data deleted: 6 listings and 5 hosts removed.");
    }
}

use crate::models::AidOrganization;

/// Static catalogue of aid organizations that events can be assigned to.
#[derive(Debug, Clone)]
pub struct OrganizationDirectory {
    organizations: Vec<AidOrganization>,
}

impl OrganizationDirectory {
    pub fn new(organizations: Vec<AidOrganization>) -> Self {
        Self { organizations }
    }

    pub fn builtin() -> Self {
        let org = |id, name: &str, contact: &str| AidOrganization {
            id,
            name: name.to_string(),
            contact: contact.to_string(),
        };
        Self::new(vec![
            org(1, "Red Cross", "contact@redcross.org"),
            org(2, "UNICEF", "contact@unicef.org"),
            org(3, "Doctors Without Borders", "info@msf.org"),
        ])
    }

    pub fn all(&self) -> &[AidOrganization] {
        &self.organizations
    }

    pub fn find(&self, id: i64) -> Option<&AidOrganization> {
        self.organizations.iter().find(|o| o.id == id)
    }
}

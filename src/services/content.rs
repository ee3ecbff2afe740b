//! Content service
//!
//! Business logic for the plain site-content tables: visitor contacts,
//! document categories, the page profile record, footer links, and the
//! about-section facts. Validation happens here so the repository only
//! ever sees well-formed values.

use crate::config::{MAX_CATEGORY_LENGTH, MAX_NAME_LENGTH, MAX_URL_LENGTH};
use crate::database::{
    Category, Contact, CreateContactRequest, CreatePageProfileRequest, CreateProfileFactRequest,
    CreateSocialLinkRequest, PageProfile, ProfileFact, Repository, SocialLink,
    UpdateContactRequest, UpdatePageProfileRequest, UpdateProfileFactRequest,
    UpdateSocialLinkRequest,
};
use crate::error::{AppError, Result};

/// Service for managing site content records
#[derive(Clone)]
pub struct ContentService {
    repo: Repository,
}

impl ContentService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    // ===== Contacts =====

    /// Record a message left by a site visitor
    pub async fn create_contact(&self, req: CreateContactRequest) -> Result<Contact> {
        let req = CreateContactRequest {
            name: require("name", &req.name, MAX_NAME_LENGTH)?,
            email: require_email(&req.email)?,
            message: require_text("message", &req.message)?,
        };

        let contact = self.repo.create_contact(req).await?;
        tracing::info!("Contact message recorded: {}", contact.id);
        Ok(contact)
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact> {
        self.repo.get_contact(id).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.repo.list_contacts().await
    }

    pub async fn update_contact(&self, id: &str, req: UpdateContactRequest) -> Result<Contact> {
        let req = UpdateContactRequest {
            name: validate_opt(req.name, |v| require("name", &v, MAX_NAME_LENGTH))?,
            email: validate_opt(req.email, |v| require_email(&v))?,
            message: validate_opt(req.message, |v| require_text("message", &v))?,
        };

        self.repo.update_contact(id, req).await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting contact: {}", id);
        self.repo.delete_contact(id).await
    }

    // ===== Categories =====

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = require("name", name, MAX_CATEGORY_LENGTH)?;
        self.repo.create_category(&name).await
    }

    pub async fn get_category(&self, id: &str) -> Result<Category> {
        self.repo.get_category(id).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.repo.list_categories().await
    }

    pub async fn rename_category(&self, id: &str, name: &str) -> Result<Category> {
        let name = require("name", name, MAX_CATEGORY_LENGTH)?;
        self.repo.rename_category(id, &name).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting category: {}", id);
        self.repo.delete_category(id).await
    }

    // ===== Page profile =====

    pub async fn create_page_profile(
        &self,
        req: CreatePageProfileRequest,
    ) -> Result<PageProfile> {
        let req = CreatePageProfileRequest {
            name: require("name", &req.name, MAX_NAME_LENGTH)?,
            job_title: require("job_title", &req.job_title, MAX_NAME_LENGTH)?,
            slogan: require_text("slogan", &req.slogan)?,
            about_me: require_text("about_me", &req.about_me)?,
            profile_image_url: require("profile_image_url", &req.profile_image_url, MAX_URL_LENGTH)?,
            about_image_url: require("about_image_url", &req.about_image_url, MAX_URL_LENGTH)?,
        };

        self.repo.create_page_profile(req).await
    }

    pub async fn get_page_profile(&self, id: &str) -> Result<PageProfile> {
        self.repo.get_page_profile(id).await
    }

    pub async fn list_page_profiles(&self) -> Result<Vec<PageProfile>> {
        self.repo.list_page_profiles().await
    }

    pub async fn update_page_profile(
        &self,
        id: &str,
        req: UpdatePageProfileRequest,
    ) -> Result<PageProfile> {
        let req = UpdatePageProfileRequest {
            name: validate_opt(req.name, |v| require("name", &v, MAX_NAME_LENGTH))?,
            job_title: validate_opt(req.job_title, |v| require("job_title", &v, MAX_NAME_LENGTH))?,
            slogan: validate_opt(req.slogan, |v| require_text("slogan", &v))?,
            about_me: validate_opt(req.about_me, |v| require_text("about_me", &v))?,
            profile_image_url: validate_opt(req.profile_image_url, |v| {
                require("profile_image_url", &v, MAX_URL_LENGTH)
            })?,
            about_image_url: validate_opt(req.about_image_url, |v| {
                require("about_image_url", &v, MAX_URL_LENGTH)
            })?,
        };

        self.repo.update_page_profile(id, req).await
    }

    pub async fn delete_page_profile(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting page profile: {}", id);
        self.repo.delete_page_profile(id).await
    }

    // ===== Social links =====

    pub async fn create_social_link(&self, req: CreateSocialLinkRequest) -> Result<SocialLink> {
        let req = CreateSocialLinkRequest {
            label: require("label", &req.label, MAX_NAME_LENGTH)?,
            url: require("url", &req.url, MAX_URL_LENGTH)?,
        };

        self.repo.create_social_link(req).await
    }

    pub async fn get_social_link(&self, id: &str) -> Result<SocialLink> {
        self.repo.get_social_link(id).await
    }

    pub async fn list_social_links(&self) -> Result<Vec<SocialLink>> {
        self.repo.list_social_links().await
    }

    pub async fn update_social_link(
        &self,
        id: &str,
        req: UpdateSocialLinkRequest,
    ) -> Result<SocialLink> {
        let req = UpdateSocialLinkRequest {
            label: validate_opt(req.label, |v| require("label", &v, MAX_NAME_LENGTH))?,
            url: validate_opt(req.url, |v| require("url", &v, MAX_URL_LENGTH))?,
        };

        self.repo.update_social_link(id, req).await
    }

    pub async fn delete_social_link(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting social link: {}", id);
        self.repo.delete_social_link(id).await
    }

    // ===== Profile facts =====

    pub async fn create_profile_fact(&self, req: CreateProfileFactRequest) -> Result<ProfileFact> {
        let req = CreateProfileFactRequest {
            title: require("title", &req.title, MAX_NAME_LENGTH)?,
            detail: require_text("detail", &req.detail)?,
        };

        self.repo.create_profile_fact(req).await
    }

    pub async fn get_profile_fact(&self, id: &str) -> Result<ProfileFact> {
        self.repo.get_profile_fact(id).await
    }

    pub async fn list_profile_facts(&self) -> Result<Vec<ProfileFact>> {
        self.repo.list_profile_facts().await
    }

    pub async fn update_profile_fact(
        &self,
        id: &str,
        req: UpdateProfileFactRequest,
    ) -> Result<ProfileFact> {
        let req = UpdateProfileFactRequest {
            title: validate_opt(req.title, |v| require("title", &v, MAX_NAME_LENGTH))?,
            detail: validate_opt(req.detail, |v| require_text("detail", &v))?,
        };

        self.repo.update_profile_fact(id, req).await
    }

    pub async fn delete_profile_fact(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting profile fact: {}", id);
        self.repo.delete_profile_fact(id).await
    }
}

/// A required string field: non-empty after trimming, within the cap
fn require(field: &'static str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} must not be empty")));
    }
    if trimmed.len() > max {
        return Err(AppError::InvalidInput(format!(
            "{field} exceeds {max} characters"
        )));
    }

    Ok(trimmed.to_string())
}

/// Free-text fields have no length cap, only the non-empty requirement
fn require_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} must not be empty")));
    }

    Ok(trimmed.to_string())
}

fn require_email(value: &str) -> Result<String> {
    let email = require("email", value, MAX_NAME_LENGTH)?;

    if !email.contains('@') {
        return Err(AppError::InvalidInput(format!(
            "email is not an email address: {email}"
        )));
    }

    Ok(email)
}

fn validate_opt<F>(value: Option<String>, validate: F) -> Result<Option<String>>
where
    F: FnOnce(String) -> Result<String>,
{
    value.map(validate).transpose()
}

use crate::domain::model::User;
use crate::utils::error::{FoodgramError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Superusers.
    Admin,
    /// Any authenticated user that is not blocked.
    AuthUser,
    /// Anyone, including anonymous callers.
    Guest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    DownloadShoppingCart,
    ShoppingCart,
    Favorite,
    ListIngredients,
    ViewRecipes,
}

impl Action {
    /// Any one of the returned capabilities is sufficient.
    pub fn required(self) -> &'static [Capability] {
        match self {
            Action::DownloadShoppingCart | Action::ShoppingCart | Action::Favorite => {
                &[Capability::Admin, Capability::AuthUser]
            }
            Action::ListIngredients | Action::ViewRecipes => &[Capability::Guest],
        }
    }
}

impl Capability {
    pub fn granted_to(self, caller: Option<&User>) -> bool {
        match (self, caller) {
            (Capability::Guest, _) => true,
            (Capability::Admin, Some(user)) => user.is_superuser,
            (Capability::AuthUser, Some(user)) => !user.is_blocked,
            (_, None) => false,
        }
    }
}

pub fn permits(action: Action, caller: Option<&User>) -> bool {
    action
        .required()
        .iter()
        .any(|capability| capability.granted_to(caller))
}

/// Anonymous callers get 401, authenticated ones 403.
pub fn authorize<'a>(action: Action, caller: Option<&'a User>) -> Result<Option<&'a User>> {
    if permits(action, caller) {
        return Ok(caller);
    }

    match caller {
        None => Err(FoodgramError::Unauthenticated),
        Some(user) => {
            tracing::warn!("User {} denied {:?}", user.username, action);
            Err(FoodgramError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool, is_blocked: bool) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            token: "t".to_string(),
            is_superuser,
            is_blocked,
        }
    }

    #[test]
    fn test_download_requires_active_user_or_admin() {
        assert!(permits(Action::DownloadShoppingCart, Some(&user(false, false))));
        assert!(permits(Action::DownloadShoppingCart, Some(&user(true, true))));
        assert!(!permits(Action::DownloadShoppingCart, Some(&user(false, true))));
        assert!(!permits(Action::DownloadShoppingCart, None));
    }

    #[test]
    fn test_ingredients_and_recipes_are_public() {
        assert!(permits(Action::ViewRecipes, None));
        assert!(permits(Action::ViewRecipes, Some(&user(false, true))));
        assert!(permits(Action::ListIngredients, None));
        assert!(permits(Action::ListIngredients, Some(&user(false, true))));
    }

    #[test]
    fn test_authorize_errors() {
        assert!(matches!(
            authorize(Action::Favorite, None),
            Err(FoodgramError::Unauthenticated)
        ));
        let blocked = user(false, true);
        assert!(matches!(
            authorize(Action::Favorite, Some(&blocked)),
            Err(FoodgramError::PermissionDenied)
        ));
        let active = user(false, false);
        assert_eq!(
            authorize(Action::ShoppingCart, Some(&active)).unwrap(),
            Some(&active)
        );
    }
}

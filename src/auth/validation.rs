//! Règles d'éligibilité des identifiants, appliquées au signup
//! et à la mise à jour de profil.

/// Noms réservés au service, refusés quelle que soit la casse.
const PROTECTED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "moderator",
    "owner",
    "root",
    "staff",
    "support",
    "system",
];

pub fn is_protected_username(username: &str) -> bool {
    let lowered = username.to_lowercase();
    PROTECTED_USERNAMES.iter().any(|name| *name == lowered)
}

/// Forme attendue: `^[A-Za-z][A-Za-z0-9_]{4,63}$`
pub fn is_valid_username(username: &str) -> bool {
    let mut chars = username.chars();

    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }

    if !(5..=64).contains(&username.len()) {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Vérification minimale de forme; le `+` est exclu pour éviter les alias.
pub fn is_valid_email(email: &str) -> bool {
    email.len() > 5 && email.contains('@') && email.contains('.') && !email.contains('+')
}

pub fn is_valid_password(password: &str) -> bool {
    (8..=128).contains(&password.len())
}

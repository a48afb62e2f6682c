//! Positive paths: every operation succeeds with valid input.

use notes_core::test_data::{random_email, random_password, random_string, DEFAULT_PASSWORD_LEN};
use notes_core::{
    decode, ChangePasswordRequest, CreateNoteRequest, LoginData, LoginRequest, NoteData,
    RawResponse, RegisterRequest, UpdateNoteRequest, UserData,
};
use notes_suite::scenario;
use serde_json::Value;

#[test]
fn register_with_valid_data_returns_201() {
    scenario("Register with valid data returns 201", |s| {
        let email = random_email("reg");
        let mut res = s.api().register(&RegisterRequest {
            name: random_string("User"),
            email: email.clone(),
            password: random_password(DEFAULT_PASSWORD_LEN),
        })?;
        s.attach(&mut res, "register")?;
        assert_eq!(res.status(), 201);

        let json = decode::<UserData, _>(&mut res)?;
        assert!(json.success);
        assert_eq!(json.status, Some(201));
        assert!(json.message().to_lowercase().contains("created"));
        let data = json.data.unwrap();
        assert!(!data.id.is_empty());
        assert_eq!(data.email, email);
        Ok(())
    });
}

#[test]
fn login_with_valid_credentials_returns_token() {
    scenario("Login with valid credentials returns 200", |s| {
        let email = random_email("login");
        let password = random_password(DEFAULT_PASSWORD_LEN);
        s.api().register(&RegisterRequest {
            name: random_string("User"),
            email: email.clone(),
            password: password.clone(),
        })?;

        let mut res = s.api().login(&LoginRequest {
            email: email.clone(),
            password,
        })?;
        s.attach(&mut res, "login")?;
        assert_eq!(res.status(), 200);

        let json = decode::<LoginData, _>(&mut res)?;
        assert!(json.success);
        let data = json.data.unwrap();
        assert!(!data.token.is_empty());
        assert_eq!(data.email, email);
        Ok(())
    });
}

#[test]
fn change_password_then_login_with_new_password() {
    scenario("Change password with valid data returns 200", |s| {
        let account = s.register_user("chg")?;
        let new_password = random_password(12);

        let mut res = s.api().change_password(
            &ChangePasswordRequest {
                current_password: account.password.clone(),
                new_password: new_password.clone(),
            },
            Some(&account.token),
        )?;
        s.attach(&mut res, "change-password")?;
        assert_eq!(res.status(), 200);
        let json = decode::<Value, _>(&mut res)?;
        assert!(json.success);
        assert!(json.message.is_some());

        let mut res = s.api().login(&LoginRequest {
            email: account.email.clone(),
            password: new_password,
        })?;
        s.attach(&mut res, "login-new-password")?;
        assert_eq!(res.status(), 200);

        let mut res = s.api().login(&LoginRequest {
            email: account.email.clone(),
            password: account.password.clone(),
        })?;
        s.attach(&mut res, "login-old-password")?;
        assert_eq!(res.status(), 401);
        Ok(())
    });
}

#[test]
fn create_note_with_valid_data_returns_200() {
    scenario("Create note with valid data returns 200", |s| {
        let account = s.register_user("cnote")?;
        let title = random_string("Note Title ");
        let description = random_string("Description ");

        let mut res = s.api().create_note(
            &CreateNoteRequest {
                title: title.clone(),
                description: description.clone(),
                category: "Personal".to_string(),
            },
            Some(&account.token),
        )?;
        s.attach(&mut res, "create-note")?;
        assert_eq!(res.status(), 200);

        let json = decode::<NoteData, _>(&mut res)?;
        assert!(json.success);
        let note = json.data.unwrap();
        assert!(!note.id.is_empty());
        assert_eq!(note.title, title);
        assert_eq!(note.description, description);
        assert_eq!(note.category, "Personal");
        assert!(!note.completed);
        Ok(())
    });
}

#[test]
fn update_note_with_valid_data_returns_200() {
    scenario("Update note with valid data returns 200", |s| {
        let account = s.register_user("unote")?;
        let note = s.create_note(&account.token)?;

        let new_title = random_string("Updated ");
        let new_description = random_string("Updated desc ");
        let mut res = s.api().update_note(
            &note.id,
            &UpdateNoteRequest {
                title: new_title.clone(),
                description: new_description.clone(),
                category: "Work".to_string(),
                completed: "true".to_string(),
            },
            Some(&account.token),
        )?;
        s.attach(&mut res, "update-note")?;
        assert_eq!(res.status(), 200);

        let json = decode::<NoteData, _>(&mut res)?;
        assert!(json.success);
        let updated = json.data.unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, new_title);
        assert_eq!(updated.description, new_description);
        assert_eq!(updated.category, "Work");
        assert!(updated.completed);
        Ok(())
    });
}

#[test]
fn delete_note_returns_200() {
    scenario("Delete note returns 200", |s| {
        let account = s.register_user("dnote")?;
        let note = s.create_note(&account.token)?;

        let mut res = s.api().delete_note(&note.id, Some(&account.token))?;
        s.attach(&mut res, "delete-note")?;
        assert_eq!(res.status(), 200);
        let json = decode::<Value, _>(&mut res)?;
        assert!(json.success);
        assert!(json.message.is_some());
        Ok(())
    });
}

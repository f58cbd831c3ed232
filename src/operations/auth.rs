use std::io::{self, Write};

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn read_login_input() -> Result<LoginInput, String> {
    let username = prompt_line("Username: ")?;
    if username.is_empty() {
        return Err("Username cannot be empty.".to_string());
    }

    let password = prompt_line("Password: ")?;
    if password.is_empty() {
        return Err("Password cannot be empty.".to_string());
    }

    Ok(LoginInput { username, password })
}

pub fn read_register_input() -> Result<RegisterInput, String> {
    let username = prompt_line("Username: ")?;
    if username.is_empty() {
        return Err("Username cannot be empty.".to_string());
    }

    let email = prompt_line("Email: ")?;

    let password = prompt_line("Password: ")?;
    if password.is_empty() {
        return Err("Password cannot be empty.".to_string());
    }

    Ok(RegisterInput {
        username,
        email,
        password,
    })
}

fn prompt_line(label: &str) -> Result<String, String> {
    print!("{}", label);
    io::stdout()
        .flush()
        .map_err(|_| "Failed to flush output".to_string())?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

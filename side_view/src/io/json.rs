use crate::profile::Profile;

pub fn read_profile_json(path: &str) -> std::io::Result<Profile> {
    let contents = crate::io::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    profile
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(profile)
}

pub fn write_profile_json(path: &str, profile: &Profile) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(profile).map_err(std::io::Error::other)?;
    crate::io::write_string(path, &json)
}

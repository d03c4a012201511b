/// Project identifiers are opaque UUID strings assigned once at creation.
pub type ProjectId = String;

/// Scene identifiers are short ids, unique within their project.
pub type SceneId = String;

/// Shot identifiers are short ids, unique within their scene.
pub type ShotId = String;

/// Team member identifiers, owned by the team roster.
pub type MemberId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// src/roster/header.rs

use super::error::ImportError;

/// Header line shown to users when the file shape is wrong.
pub const EXPECTED_HEADER: &str = "className,grade,studentName,studentEmail,studentId";

/// Semantic meaning of a CSV column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    ClassName,
    Grade,
    StudentName,
    StudentEmail,
    StudentId,
}

impl ColumnRole {
    /// Resolution order; earlier roles claim columns first.
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::ClassName,
        ColumnRole::Grade,
        ColumnRole::StudentName,
        ColumnRole::StudentEmail,
        ColumnRole::StudentId,
    ];

    /// Lowercase substrings accepted for this role.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::ClassName => &["classname", "class_name", "class"],
            ColumnRole::Grade => &["grade"],
            ColumnRole::StudentName => &["studentname", "student_name", "name"],
            ColumnRole::StudentEmail => &["studentemail", "student_email", "email"],
            ColumnRole::StudentId => &["studentid", "student_id", "id"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnRole::ClassName => "class name",
            ColumnRole::Grade => "grade",
            ColumnRole::StudentName => "student name",
            ColumnRole::StudentEmail => "student email",
            ColumnRole::StudentId => "student id",
        }
    }

    fn example(&self) -> &'static str {
        match self {
            ColumnRole::ClassName => "className",
            ColumnRole::Grade => "grade",
            ColumnRole::StudentName => "studentName",
            ColumnRole::StudentEmail => "studentEmail",
            ColumnRole::StudentId => "studentId",
        }
    }
}

/// Column positions inferred from a header row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub class_name: usize,
    pub grade: Option<usize>,
    pub student_name: usize,
    pub student_email: Option<usize>,
    pub student_id: Option<usize>,
    /// Number of header columns; rows shorter than this are rejected.
    pub width: usize,
}

impl ColumnMap {
    /// Infer column roles from cleaned header tokens.
    ///
    /// For each role, the leftmost header containing any of its aliases
    /// (case-insensitive) wins. A header already taken by an earlier role is
    /// skipped, so `className` never doubles as the student-name column.
    pub fn infer(headers: &[String]) -> Result<Self, ImportError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let mut claimed = vec![false; headers.len()];
        let mut found = [None; 5];

        for (slot, role) in ColumnRole::ALL.iter().enumerate() {
            let hit = lowered
                .iter()
                .enumerate()
                .find(|(i, h)| !claimed[*i] && role.aliases().iter().any(|a| h.contains(a)))
                .map(|(i, _)| i);
            if let Some(i) = hit {
                claimed[i] = true;
            }
            found[slot] = hit;
        }

        let require = |role: ColumnRole, idx: Option<usize>| {
            idx.ok_or_else(|| ImportError::MissingColumn {
                column: role.label(),
                example: role.example(),
                found: headers.to_vec(),
            })
        };

        Ok(Self {
            class_name: require(ColumnRole::ClassName, found[0])?,
            grade: found[1],
            student_name: require(ColumnRole::StudentName, found[2])?,
            student_email: found[3],
            student_id: found[4],
            width: headers.len(),
        })
    }

    pub fn position(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::ClassName => Some(self.class_name),
            ColumnRole::Grade => self.grade,
            ColumnRole::StudentName => Some(self.student_name),
            ColumnRole::StudentEmail => self.student_email,
            ColumnRole::StudentId => self.student_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(s: &str) -> Vec<String> {
        s.split(',').map(str::to_string).collect()
    }

    #[test]
    fn canonical_header() {
        let map = ColumnMap::infer(&headers(EXPECTED_HEADER)).unwrap();
        assert_eq!(
            map,
            ColumnMap {
                class_name: 0,
                grade: Some(1),
                student_name: 2,
                student_email: Some(3),
                student_id: Some(4),
                width: 5,
            }
        );
    }

    #[test]
    fn reordered_and_aliased_headers() {
        let map = ColumnMap::infer(&headers("Email,Student_ID,Full Name,Class,Grade Level")).unwrap();
        assert_eq!(map.class_name, 3);
        assert_eq!(map.grade, Some(4));
        assert_eq!(map.student_name, 2);
        assert_eq!(map.student_email, Some(0));
        assert_eq!(map.student_id, Some(1));
        assert_eq!(map.position(ColumnRole::StudentEmail), Some(0));
    }

    #[test]
    fn leftmost_match_wins() {
        let map = ColumnMap::infer(&headers("class,name,nickname")).unwrap();
        assert_eq!(map.student_name, 1);

        let map = ColumnMap::infer(&headers("className,name,studentName")).unwrap();
        assert_eq!(map.student_name, 1);
        assert_eq!(map.grade, None);
        assert_eq!(map.student_email, None);
        assert_eq!(map.student_id, None);
    }

    #[test]
    fn class_column_is_not_reused_for_student_name() {
        let map = ColumnMap::infer(&headers("ClassName,Name")).unwrap();
        assert_eq!(map.class_name, 0);
        assert_eq!(map.student_name, 1);

        let err = ColumnMap::infer(&headers("class_name,grade")).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingColumn { column: "student name", .. }
        ));
    }

    #[test]
    fn missing_class_column_reports_headers() {
        let err = ColumnMap::infer(&headers("studentName,studentEmail")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("class name"));
        assert!(msg.contains("Found headers: studentName, studentEmail"));
    }
}

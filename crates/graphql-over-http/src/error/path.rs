/// The path to the response field an error relates to.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct ErrorPath(Vec<ErrorPathSegment>);

impl ErrorPath {
    pub fn push(&mut self, segment: impl InsertIntoErrorPath) {
        segment.insert_into(self);
    }

    #[must_use]
    pub fn child(&self, segment: impl InsertIntoErrorPath) -> Self {
        let mut path = self.clone();
        segment.insert_into(&mut path);
        path
    }
}

impl std::ops::Deref for ErrorPath {
    type Target = Vec<ErrorPathSegment>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum ErrorPathSegment {
    Field(Box<str>),
    Index(usize),
}

pub trait InsertIntoErrorPath {
    fn insert_into(self, path: &mut ErrorPath);
}

impl InsertIntoErrorPath for ErrorPathSegment {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(self);
    }
}

impl InsertIntoErrorPath for &str {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Field(self.into()));
    }
}

impl InsertIntoErrorPath for String {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Field(self.into_boxed_str()));
    }
}

impl InsertIntoErrorPath for usize {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Index(self));
    }
}

impl<T: InsertIntoErrorPath> From<T> for ErrorPath {
    fn from(segment: T) -> Self {
        let mut path = ErrorPath(Vec::new());
        segment.insert_into(&mut path);
        path
    }
}

/// The set of sigils the lexer dispatches on. All non-default sigils are derived from the
/// `open`/`close` pair using the same `{{`-relative convention as the built-in table, so a
/// `{{=<% %>=}}` retarget yields `<%{`/`}%>` for the literal-triple forms and `<%#`, `<%/`,
/// `<%&`, `<%!`, `<%^`, `<%>`, `<%=`/`=%>` for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn default_mustache() -> Self {
        Self::new("{{", "}}")
    }

    pub fn open_triple(&self) -> String {
        format!("{}{{", self.open)
    }

    pub fn close_triple(&self) -> String {
        format!("}}{}", self.close)
    }

    pub fn section_open(&self) -> String {
        format!("{}#", self.open)
    }

    pub fn section_close(&self) -> String {
        format!("{}/", self.open)
    }

    pub fn inverted(&self) -> String {
        format!("{}^", self.open)
    }

    pub fn ampersand(&self) -> String {
        format!("{}&", self.open)
    }

    pub fn comment(&self) -> String {
        format!("{}!", self.open)
    }

    pub fn partial(&self) -> String {
        format!("{}>", self.open)
    }

    pub fn set_delimiter_open(&self) -> String {
        format!("{}=", self.open)
    }

    pub fn set_delimiter_close(&self) -> String {
        format!("={}", self.close)
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::default_mustache()
    }
}

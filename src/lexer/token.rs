use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    // Identifiers and Literals
    Ident,
    Number,
    String,

    // Operators
    Arrow,

    // Keywords
    Load,
    Analyze,
    Filter,
    Export,
    Train,
    Predict,
    Model,
    Generate,
    Verify,
    Submit,
    Proof,

    // File Formats
    Fasta,
    Fastq,
    Vcf,
    Bam,
    Sam,
    Cram,
    Sff,
    Csfasta,
}

impl TokenKind {
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            TokenKind::Fasta
                | TokenKind::Fastq
                | TokenKind::Vcf
                | TokenKind::Bam
                | TokenKind::Sam
                | TokenKind::Cram
                | TokenKind::Sff
                | TokenKind::Csfasta
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[rustfmt::skip]
        let pretty = match self {
            TokenKind::Eof      => "EOF",
            TokenKind::Ident    => "IDENTIFIER",
            TokenKind::Number   => "NUMBER",
            TokenKind::String   => "STRING",
            TokenKind::Arrow    => "->",
            TokenKind::Load     => "LOAD",
            TokenKind::Analyze  => "ANALYZE",
            TokenKind::Filter   => "FILTER",
            TokenKind::Export   => "EXPORT",
            TokenKind::Train    => "TRAIN",
            TokenKind::Predict  => "PREDICT",
            TokenKind::Model    => "MODEL",
            TokenKind::Generate => "GENERATE",
            TokenKind::Verify   => "VERIFY",
            TokenKind::Submit   => "SUBMIT",
            TokenKind::Proof    => "PROOF",
            TokenKind::Fasta    => "FASTA",
            TokenKind::Fastq    => "FASTQ",
            TokenKind::Vcf      => "VCF",
            TokenKind::Bam      => "BAM",
            TokenKind::Sam      => "SAM",
            TokenKind::Cram     => "CRAM",
            TokenKind::Sff      => "SFF",
            TokenKind::Csfasta  => "CSFASTA",
        };

        write!(f, "{}", pretty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, literal: S, line: usize, column: usize) -> Token {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.literal),
            TokenKind::Ident | TokenKind::Number => write!(f, "{}", self.literal),
            kind => write!(f, "{}", kind),
        }
    }
}

pub fn lookup_ident(ident: &str) -> TokenKind {
    #[rustfmt::skip]
    let kind = match ident {
        "LOAD"     => TokenKind::Load,
        "ANALYZE"  => TokenKind::Analyze,
        "FILTER"   => TokenKind::Filter,
        "EXPORT"   => TokenKind::Export,
        "TRAIN"    => TokenKind::Train,
        "PREDICT"  => TokenKind::Predict,
        "MODEL"    => TokenKind::Model,
        "GENERATE" => TokenKind::Generate,
        "VERIFY"   => TokenKind::Verify,
        "SUBMIT"   => TokenKind::Submit,
        "PROOF"    => TokenKind::Proof,
        "FASTA"    => TokenKind::Fasta,
        "FASTQ"    => TokenKind::Fastq,
        "VCF"      => TokenKind::Vcf,
        "BAM"      => TokenKind::Bam,
        "SAM"      => TokenKind::Sam,
        "CRAM"     => TokenKind::Cram,
        "SFF"      => TokenKind::Sff,
        "CSFASTA"  => TokenKind::Csfasta,
        _          => TokenKind::Ident,
    };

    kind
}

//! File classification by extension
//!
//! Decides whether a file is compiled (Sources phase), bundled (Resources
//! phase) or left out of the build, and which `lastKnownFileType` Xcode uses
//! for it.

/// Build role of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Source,
    Resource,
    Ignored,
}

/// Extension → (role, Xcode file type)
const KNOWN_EXTENSIONS: &[(&str, FileType, &str)] = &[
    // Compiled
    ("swift", FileType::Source, "sourcecode.swift"),
    ("m", FileType::Source, "sourcecode.c.objc"),
    ("mm", FileType::Source, "sourcecode.cpp.objcpp"),
    ("c", FileType::Source, "sourcecode.c.c"),
    ("cc", FileType::Source, "sourcecode.cpp.cpp"),
    ("cpp", FileType::Source, "sourcecode.cpp.cpp"),
    ("cxx", FileType::Source, "sourcecode.cpp.cpp"),
    ("s", FileType::Source, "sourcecode.asm"),
    ("metal", FileType::Source, "sourcecode.metal"),
    ("xcdatamodeld", FileType::Source, "wrapper.xcdatamodeld"),
    ("xcmappingmodel", FileType::Source, "wrapper.xcmappingmodel"),
    ("intentdefinition", FileType::Source, "file.intentdefinition"),
    // Bundled
    ("xcassets", FileType::Resource, "folder.assetcatalog"),
    ("storyboard", FileType::Resource, "file.storyboard"),
    ("xib", FileType::Resource, "file.xib"),
    ("strings", FileType::Resource, "text.plist.strings"),
    ("stringsdict", FileType::Resource, "text.plist.stringsdict"),
    ("plist", FileType::Resource, "text.plist.xml"),
    ("json", FileType::Resource, "text.json"),
    ("png", FileType::Resource, "image.png"),
    ("jpg", FileType::Resource, "image.jpeg"),
    ("jpeg", FileType::Resource, "image.jpeg"),
    ("gif", FileType::Resource, "image.gif"),
    ("pdf", FileType::Resource, "image.pdf"),
    ("svg", FileType::Resource, "text.svg"),
    ("heic", FileType::Resource, "image.heic"),
    ("ttf", FileType::Resource, "file"),
    ("otf", FileType::Resource, "file"),
    ("wav", FileType::Resource, "audio.wav"),
    ("mp3", FileType::Resource, "audio.mp3"),
    ("caf", FileType::Resource, "file"),
    ("m4a", FileType::Resource, "file"),
    ("mp4", FileType::Resource, "file"),
    ("mov", FileType::Resource, "video.quicktime"),
    ("html", FileType::Resource, "text.html"),
    ("css", FileType::Resource, "text.css"),
    ("js", FileType::Resource, "sourcecode.javascript"),
    ("txt", FileType::Resource, "text"),
    ("xml", FileType::Resource, "text.xml"),
    ("bundle", FileType::Resource, "wrapper.plug-in"),
    // Referenced but never part of a phase
    ("h", FileType::Ignored, "sourcecode.c.h"),
    ("hpp", FileType::Ignored, "sourcecode.cpp.h"),
    ("md", FileType::Ignored, "net.daringfireball.markdown"),
    ("entitlements", FileType::Ignored, "text.plist.entitlements"),
    ("xcconfig", FileType::Ignored, "text.xcconfig"),
];

/// Files Xcode processes through build settings rather than a phase
const SETTINGS_FILES: &[&str] = &["Info.plist"];

impl FileType {
    /// Classify a file by name
    pub fn from_name(name: &str) -> Self {
        if SETTINGS_FILES.contains(&name) {
            return FileType::Ignored;
        }
        lookup(name).map_or(FileType::Ignored, |(role, _)| role)
    }
}

/// Xcode `lastKnownFileType` for a file name, if the extension is known
pub fn last_known_file_type(name: &str) -> Option<&'static str> {
    lookup(name).map(|(_, file_type)| file_type)
}

fn lookup(name: &str) -> Option<(FileType, &'static str)> {
    let (_, extension) = name.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .find(|(ext, _, _)| *ext == extension)
        .map(|(_, role, file_type)| (*role, *file_type))
}

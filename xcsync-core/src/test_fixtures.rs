//! Shared fixtures for unit tests

use std::fs;
use std::path::Path;

use crate::graph::IdGenerator;
use crate::pbxproj::Project;

pub const MAIN_GROUP: &str = "AA0000000000000000000001";
pub const APP_GROUP: &str = "AA0000000000000000000002";
pub const SOURCES_PHASE: &str = "CC0000000000000000000001";
pub const RESOURCES_PHASE: &str = "CC0000000000000000000002";
pub const TOOL_SOURCES_PHASE: &str = "CC0000000000000000000004";
pub const APP_DELEGATE_REF: &str = "FF0000000000000000000001";

/// Minimal application project: an `App` group, an `App` target with
/// Sources/Frameworks/Resources phases and a `Tool` target with Sources only
pub const FIXTURE: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 50;
	objects = {

/* Begin PBXBuildFile section */
		BB0000000000000000000001 /* AppDelegate.swift in Sources */ = {isa = PBXBuildFile; fileRef = FF0000000000000000000001 /* AppDelegate.swift */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
		FF0000000000000000000001 /* AppDelegate.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = AppDelegate.swift; sourceTree = "<group>"; };
		FF0000000000000000000002 /* App.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = App.app; sourceTree = BUILT_PRODUCTS_DIR; };
/* End PBXFileReference section */

/* Begin PBXFrameworksBuildPhase section */
		CC0000000000000000000003 /* Frameworks */ = {
			isa = PBXFrameworksBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXFrameworksBuildPhase section */

/* Begin PBXGroup section */
		AA0000000000000000000001 = {
			isa = PBXGroup;
			children = (
				AA0000000000000000000002 /* App */,
				AA0000000000000000000003 /* Products */,
			);
			sourceTree = "<group>";
		};
		AA0000000000000000000002 /* App */ = {
			isa = PBXGroup;
			children = (
				FF0000000000000000000001 /* AppDelegate.swift */,
			);
			path = App;
			sourceTree = "<group>";
		};
		AA0000000000000000000003 /* Products */ = {
			isa = PBXGroup;
			children = (
				FF0000000000000000000002 /* App.app */,
			);
			name = Products;
			sourceTree = "<group>";
		};
/* End PBXGroup section */

/* Begin PBXNativeTarget section */
		DD0000000000000000000001 /* App */ = {
			isa = PBXNativeTarget;
			buildConfigurationList = 110000000000000000000001 /* Build configuration list for PBXNativeTarget "App" */;
			buildPhases = (
				CC0000000000000000000001 /* Sources */,
				CC0000000000000000000003 /* Frameworks */,
				CC0000000000000000000002 /* Resources */,
			);
			buildRules = (
			);
			dependencies = (
			);
			name = App;
			productName = App;
			productReference = FF0000000000000000000002 /* App.app */;
			productType = "com.apple.product-type.application";
		};
		DD0000000000000000000002 /* Tool */ = {
			isa = PBXNativeTarget;
			buildPhases = (
				CC0000000000000000000004 /* Sources */,
			);
			name = Tool;
			productName = Tool;
			productType = "com.apple.product-type.tool";
		};
/* End PBXNativeTarget section */

/* Begin PBXProject section */
		EE0000000000000000000001 /* Project object */ = {
			isa = PBXProject;
			buildConfigurationList = 110000000000000000000002 /* Build configuration list for PBXProject "App" */;
			compatibilityVersion = "Xcode 9.3";
			developmentRegion = en;
			hasScannedForEncodings = 0;
			knownRegions = (
				en,
				Base,
			);
			mainGroup = AA0000000000000000000001;
			productRefGroup = AA0000000000000000000003 /* Products */;
			projectDirPath = "";
			projectRoot = "";
			targets = (
				DD0000000000000000000001 /* App */,
				DD0000000000000000000002 /* Tool */,
			);
		};
/* End PBXProject section */

/* Begin PBXResourcesBuildPhase section */
		CC0000000000000000000002 /* Resources */ = {
			isa = PBXResourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXResourcesBuildPhase section */

/* Begin PBXSourcesBuildPhase section */
		CC0000000000000000000001 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
				BB0000000000000000000001 /* AppDelegate.swift in Sources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
		CC0000000000000000000004 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXSourcesBuildPhase section */

/* Begin XCBuildConfiguration section */
		120000000000000000000001 /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				PRODUCT_NAME = "$(TARGET_NAME)";
				SWIFT_VERSION = 4.0;
			};
			name = Debug;
		};
/* End XCBuildConfiguration section */

/* Begin XCConfigurationList section */
		110000000000000000000001 /* Build configuration list for PBXNativeTarget "App" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				120000000000000000000001 /* Debug */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Debug;
		};
		110000000000000000000002 /* Build configuration list for PBXProject "App" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Debug;
		};
/* End XCConfigurationList section */
	};
	rootObject = EE0000000000000000000001 /* Project object */;
}
"#;

/// The fixture project with reproducible id generation
pub fn fixture_project() -> Project {
    let mut project = Project::parse(FIXTURE).unwrap();
    project.graph.set_id_generator(IdGenerator::sequential());
    project
}

/// Create the given files (and their parent directories) below `root`
pub fn write_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("// {}\n", file)).unwrap();
    }
}

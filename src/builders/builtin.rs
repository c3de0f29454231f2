/// Configuration applied when no system configuration file exists.
///
/// Every line must load without a diagnostic; a failure here is fatal.
pub const BUILTIN_CONFIG: &str = r#"
# View columns
set blame-view  = date:default author:full file-name:auto id:yes line-number:no,interval=5 text
set blob-view   = line-number:no,interval=5 text
set diff-view   = line-number:no,interval=5 text:yes,commands
set grep-view   = file-name:no line-number:yes,interval=1 text
set log-view    = line-number:no,interval=5 text
set main-view   = line-number:no,interval=5 id:no date:default author:full commit-title:yes,graph,refs,overflow=no
set pager-view  = line-number:no,interval=5 text
set refs-view   = line-number:no id:no date:default author:full ref commit-title
set stage-view  = line-number:no,interval=5 text
set stash-view  = line-number:no,interval=5 id:no date:default author:full commit-title
set status-view = line-number:no,interval=5 status:short file-name
set tree-view   = line-number:no,interval=5 mode author:full file-size date:default id:no file-name

# General settings
set commit-order          = default
set editor-line-number    = yes
set horizontal-scroll     = 50%
set ignore-case           = no
set ignore-space          = no
set line-graphics         = default
set mouse                 = no
set refresh-mode          = auto
set reference-format      = [branch] <tag> {remote} ~replace~
set show-changes          = yes
set show-notes            = yes
set split-view-height     = 67%
set status-untracked-dirs = yes
set tab-size              = 8
set vertical-split        = auto
set wrap-lines            = no

# Generic bindings
bind generic <Enter>      enter
bind generic <LessThan>   back
bind generic J            next
bind generic K            previous
bind generic ,            parent
bind generic <Tab>        view-next
bind generic R            refresh
bind generic <F5>         refresh
bind generic O            maximize
bind generic q            view-close
bind generic Q            quit
bind generic <C-C>        quit
bind generic m            view-main
bind generic d            view-diff
bind generic l            view-log
bind generic L            view-reflog
bind generic t            view-tree
bind generic f            view-blob
bind generic B            view-blame
bind generic r            view-refs
bind generic s            view-status
bind generic S            view-status
bind generic c            view-stage
bind generic y            view-stash
bind generic g            view-grep
bind generic p            view-pager
bind generic h            view-help
bind generic k            move-up
bind generic j            move-down
bind generic <Up>         move-up
bind generic <Down>       move-down
bind generic <PgUp>       move-page-up
bind generic <PgDown>     move-page-down
bind generic -            move-page-up
bind generic <Space>      move-page-down
bind generic ^U           move-half-page-up
bind generic ^D           move-half-page-down
bind generic <Home>       move-first-line
bind generic <End>        move-last-line
bind generic G            move-last-line
bind generic ^Y           scroll-line-up
bind generic ^E           scroll-line-down
bind generic <Left>       scroll-left
bind generic <Right>      scroll-right
bind generic |            scroll-first-col
bind generic /            search
bind generic ?            search-back
bind generic n            find-next
bind generic N            find-prev
bind generic e            edit
bind generic o            options
bind generic :            prompt
bind generic ^L           screen-redraw
bind generic z            stop-loading
bind generic v            show-version

# Option toggles
bind generic D            :toggle date
bind generic A            :toggle author
bind generic X            :toggle id
bind generic F            :toggle file-filter
bind generic W            :toggle ignore-space
bind generic ~            :toggle line-graphics
bind generic $            :toggle commit-title-overflow
bind generic [            :toggle diff-context -1
bind generic ]            :toggle diff-context +1

# View specific bindings
bind search  <Down>       find-next
bind search  <Up>         find-prev
bind status  u            status-update
bind status  !            status-revert
bind status  M            status-merge
bind status  C            !git commit
bind stage   u            status-update
bind stage   !            status-revert
bind stage   1            stage-update-line
bind stage   \            stage-split-chunk
bind main    C            ?git cherry-pick %(commit)
bind refs    C            ?git checkout %(branch)
bind refs    !            ?git branch -D %(branch)
bind stash   A            ?git stash apply %(stash)
bind stash   P            ?git stash pop %(stash)
bind stash   !            ?git stash drop %(stash)

# Colors
color default             default  default  normal
color cursor              white    green    bold
color status              green    default
color delimiter           magenta  default
color date                blue     default
color mode                cyan     default
color id                  magenta  default
color overflow            red      default
color header              yellow   default
color section             cyan     default
color directory           yellow   default
color file                default  default
color file-size           default  default
color line-number         cyan     default
color title-blur          white    blue
color title-focus         white    blue     bold
color search-result       black    yellow
color graph-commit        blue     default
color main-commit         default  default
color main-annotated      default  default  bold
color main-tag            magenta  default  bold
color main-local-tag      magenta  default
color main-remote         yellow   default
color main-replace        cyan     default
color main-tracked        yellow   default  bold
color main-ref            cyan     default
color main-head           cyan     default  bold
color stat-none           default  default
color stat-staged         magenta  default
color stat-unstaged       magenta  default
color stat-untracked      magenta  default
color help-group          blue     default
color help-action         yellow   default
color diff-stat           blue     default
color diff-add            green    default
color diff-add2           green    default
color diff-del            red      default
color diff-del2           red      default
color diff-header         yellow   default
color diff-index          blue     default
color diff-chunk          magenta  default
color tree.header         blue     default
color tree.directory      yellow   default
color grep.file           blue     default
color "---"               blue     default
color "+++ "              blue     default
color "@@"                magenta  default
color "diff --"           yellow   default
color "commit "           green    default
color "Author: "          cyan     default
color "Date: "            yellow   default
color "Merge: "           blue     default
color "Refs: "            red      default
color "    Signed-off-by" yellow   default
color "    Acked-by"      yellow   default
color "    Tested-by"     yellow   default
color "    Reviewed-by"   yellow   default
"#;
